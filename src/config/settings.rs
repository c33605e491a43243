use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

use crate::pacing::Pacing;

/// Default CSV destination, relative to the working directory.
pub const DEFAULT_OUTPUT_PATH: &str = "result.csv";

/// Problems found while assembling [`Settings`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    MissingValue(&'static str),
    #[error("invalid base url {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("base url must end with '/': {0}")]
    BaseUrlMissingTrailingSlash(String),
    #[error("{name} must be a finite, non-negative number of seconds (got {value})")]
    InvalidDelay { name: &'static str, value: f64 },
}

/// Panel login.
#[derive(Clone)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Database and table whose grid is scraped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableTarget {
    pub database: String,
    pub table: String,
}

impl TableTarget {
    pub fn new(database: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            table: table.into(),
        }
    }
}

/// Everything a single run needs. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct Settings {
    base_url: Url,
    credentials: Credentials,
    target: TableTarget,
    pacing: Pacing,
    output_path: PathBuf,
}

impl Settings {
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::new()
    }

    /// Panel root, always ending with `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn target(&self) -> &TableTarget {
        &self.target
    }

    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

/// Fluent builder for [`Settings`].
#[derive(Clone)]
pub struct SettingsBuilder {
    base_url: Option<String>,
    login: Option<String>,
    password: Option<String>,
    database: Option<String>,
    table: Option<String>,
    base_delay: f64,
    delay_multiplier: f64,
    output_path: PathBuf,
}

impl SettingsBuilder {
    pub fn new() -> Self {
        let pacing = Pacing::default();
        Self {
            base_url: None,
            login: None,
            password: None,
            database: None,
            table: None,
            base_delay: pacing.base_delay(),
            delay_multiplier: pacing.delay_multiplier(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn credentials(mut self, login: impl Into<String>, password: impl Into<String>) -> Self {
        self.login = Some(login.into());
        self.password = Some(password.into());
        self
    }

    pub fn target(mut self, database: impl Into<String>, table: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self.table = Some(table.into());
        self
    }

    pub fn base_delay(mut self, seconds: f64) -> Self {
        self.base_delay = seconds;
        self
    }

    pub fn delay_multiplier(mut self, seconds: f64) -> Self {
        self.delay_multiplier = seconds;
        self
    }

    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn build(self) -> Result<Settings, ConfigError> {
        let raw_url = required("BASE_URL", self.base_url)?;
        let login = required("LOGIN", self.login)?;
        // An empty password is a valid login (`AllowNoPassword`).
        let password = self.password.ok_or(ConfigError::MissingValue("PASSWORD"))?;
        let database = required("DB_NAME", self.database)?;
        let table = required("TABLE_NAME", self.table)?;

        let base_url = parse_base_url(&raw_url)?;
        let pacing = Pacing::new(self.base_delay, self.delay_multiplier)?;

        if self.output_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingValue("OUTPUT_PATH"));
        }

        Ok(Settings {
            base_url,
            credentials: Credentials { login, password },
            target: TableTarget { database, table },
            pacing,
            output_path: self.output_path,
        })
    }
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn required(name: &'static str, value: Option<String>) -> Result<String, ConfigError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingValue(name)),
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    // Relative joins like `index.php` silently drop the last path segment
    // unless the base ends with a slash.
    if !raw.ends_with('/') {
        return Err(ConfigError::BaseUrlMissingTrailingSlash(raw.to_string()));
    }
    Url::parse(raw).map_err(|source| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })
}
