//! Command line and environment parsing for the binary.

use std::path::PathBuf;

use clap::Parser;

use pma_table_scraper::config::settings::DEFAULT_OUTPUT_PATH;
use pma_table_scraper::{ConfigError, Settings};

/// Export one phpMyAdmin table to CSV.
///
/// Every option can also be supplied through the environment variable shown,
/// or through a `.env` file in the working directory.
#[derive(Debug, Parser)]
#[command(name = "pma-table-scraper", version, about)]
pub struct Cli {
    /// Panel root URL, ending with '/'
    #[arg(long, env = "BASE_URL")]
    pub base_url: String,

    /// Login name
    #[arg(long, env = "LOGIN")]
    pub login: String,

    /// Login password
    #[arg(long, env = "PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Database holding the table
    #[arg(long = "db", env = "DB_NAME")]
    pub db_name: String,

    /// Table to export
    #[arg(long = "table", env = "TABLE_NAME")]
    pub table_name: String,

    /// Fixed part of the pause before each request, in seconds
    #[arg(long, env = "BASE_DELAY", default_value_t = 1.0)]
    pub base_delay: f64,

    /// Upper bound of the random part of the pause, in seconds
    #[arg(long, env = "DELAY_MULTIPLIER", default_value_t = 1.0)]
    pub delay_multiplier: f64,

    /// CSV destination (overwritten)
    #[arg(short, long, env = "OUTPUT_PATH", default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Log every request
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn into_settings(self) -> Result<Settings, ConfigError> {
        Settings::builder()
            .base_url(self.base_url)
            .credentials(self.login, self.password)
            .target(self.db_name, self.table_name)
            .base_delay(self.base_delay)
            .delay_multiplier(self.delay_multiplier)
            .output_path(self.output)
            .build()
    }
}
