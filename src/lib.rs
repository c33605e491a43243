//! # pma-table-scraper
//!
//! Logs into a phpMyAdmin panel, opens one table, scrapes the rendered results
//! grid and exports it to CSV and to the console.
//!
//! The run is strictly sequential: load the login page, post the credentials
//! with the page's CSRF token, select the database, fetch the table page, then
//! write the output. A randomised pause precedes each request after the first.
//!
//! ## Example
//!
//! ```no_run
//! use pma_table_scraper::{Settings, TableScraper};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::builder()
//!         .base_url("http://localhost/phpmyadmin/")
//!         .credentials("root", "secret")
//!         .target("shop", "products")
//!         .build()?;
//!     let table = TableScraper::new(settings)?.scrape().await?;
//!     println!("{} rows", table.rows.len());
//!     Ok(())
//! }
//! ```

mod scrape;

pub mod auth;
pub mod config;
pub mod export;
pub mod extract;
pub mod fetch;
pub mod pacing;
pub mod session;
pub mod table;

pub use crate::scrape::{ScrapeError, ScrapeResult, TableScraper, run};

pub use crate::auth::{Token, authenticate};
pub use crate::config::{ConfigError, Credentials, Settings, SettingsBuilder, TableTarget};
pub use crate::export::{export_csv, print_report, write_csv, write_report};
pub use crate::extract::{ExtractionError, extract_table, extract_token};
pub use crate::fetch::fetch_table;
pub use crate::pacing::Pacing;
pub use crate::session::{PageResponse, Session};
pub use crate::table::{MisalignedRow, TableResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
