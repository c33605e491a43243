//! Settings and configuration module
//!
//! Provides the immutable run configuration with:
//! - Builder pattern
//! - Validation before any network activity
//! - Defaults matching the panel's expectations

pub mod settings;

pub use settings::{ConfigError, Credentials, Settings, SettingsBuilder, TableTarget};
