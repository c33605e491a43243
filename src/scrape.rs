//! Run orchestration.
//!
//! Wires the session, pacing, login, table fetch and export together into the
//! single sequential run the binary performs: authenticate, pause, fetch the
//! grid, then write the CSV and the console report.

use std::path::Path;

use thiserror::Error;

use crate::auth::{Token, authenticate};
use crate::config::{ConfigError, Settings};
use crate::export::{export_csv, print_report};
use crate::extract::ExtractionError;
use crate::fetch::fetch_table;
use crate::pacing::Pacing;
use crate::session::Session;
use crate::table::TableResult;

/// Result alias used across the crate.
pub type ScrapeResult<T> = Result<T, ScrapeError>;

/// High-level error surfaced by a run. Nothing is retried; every variant
/// aborts the run.
#[derive(Debug, Error)]
pub enum ScrapeError {
	#[error("configuration error: {0}")]
	Config(#[from] ConfigError),
	#[error("http error: {0}")]
	Network(#[from] reqwest::Error),
	#[error("url error: {0}")]
	Url(#[from] url::ParseError),
	#[error("extraction failed: {0}")]
	Extraction(#[from] ExtractionError),
	#[error("filesystem error: {0}")]
	Filesystem(#[from] std::io::Error),
	#[error("csv error: {0}")]
	Csv(#[from] csv::Error),
}

/// Owns everything a run touches: the settings, the pacing and the one
/// cookie-carrying session.
pub struct TableScraper {
	settings: Settings,
	pacing: Pacing,
	session: Session,
}

impl TableScraper {
	pub fn new(settings: Settings) -> ScrapeResult<Self> {
		let session = Session::new()?;
		Ok(Self::with_session(settings, session))
	}

	/// Use a pre-built session, e.g. one whose client carries a proxy.
	pub fn with_session(settings: Settings, session: Session) -> Self {
		let pacing = settings.pacing();
		Self {
			settings,
			pacing,
			session,
		}
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	/// Logs in and returns the CSRF token for the rest of the run.
	pub async fn login(&self) -> ScrapeResult<Token> {
		authenticate(
			&self.session,
			self.settings.base_url(),
			self.settings.credentials(),
			&self.pacing,
		)
		.await
	}

	/// Logs in, pauses, and fetches the target table.
	pub async fn scrape(&self) -> ScrapeResult<TableResult> {
		let target = self.settings.target();
		log::info!(
			"logging into {} to read {}.{}",
			self.settings.base_url(),
			target.database,
			target.table
		);

		let token = self.login().await?;

		self.pacing.pause().await;

		fetch_table(
			&self.session,
			self.settings.base_url(),
			target,
			&token,
			&self.pacing,
		)
		.await
	}
}

/// Full run: scrape, then export to the configured CSV path and print the
/// report. Nothing is written unless the whole table was extracted.
pub async fn run(settings: Settings) -> ScrapeResult<TableResult> {
	let scraper = TableScraper::new(settings)?;
	let table = scraper.scrape().await?;

	warn_misaligned(&table);

	let output = scraper.settings().output_path();
	export_csv(&table, output)?;
	print_report(&table)?;

	log_summary(&table, output);
	Ok(table)
}

fn warn_misaligned(table: &TableResult) {
	for row in table.misaligned_rows() {
		log::warn!(
			"row {} has {} cells but there are {} headers; the grid layout may have changed",
			row.index,
			row.width,
			table.width()
		);
	}
}

fn log_summary(table: &TableResult, output: &Path) {
	if table.is_empty() {
		log::warn!("table has no data rows; {} holds only the header", output.display());
	} else {
		log::info!("done: {} rows exported to {}", table.rows.len(), output.display());
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn errors_render_their_layer() {
		let err = ScrapeError::from(ExtractionError::ResultsTableMissing);
		assert!(err.to_string().starts_with("extraction failed"));

		let err = ScrapeError::from(ConfigError::MissingValue("LOGIN"));
		assert_eq!(err.to_string(), "configuration error: missing required setting: LOGIN");
	}

	#[tokio::test]
	async fn unreachable_panel_is_a_network_error() {
		let settings = Settings::builder()
			.base_url("http://127.0.0.1:9/")
			.credentials("root", "secret")
			.target("shop", "items")
			.base_delay(0.0)
			.delay_multiplier(0.0)
			.build()
			.unwrap();
		let err = TableScraper::new(settings).unwrap().scrape().await.unwrap_err();
		assert!(matches!(err, ScrapeError::Network(_)));
	}
}
