//! Page parsing helpers.
//!
//! The selectors here encode the layout of the panel's login form and results
//! grid. They are intentionally rigid: when the panel changes its markup the
//! extractor fails loudly instead of guessing.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use crate::table::TableResult;

/// `name` of the hidden login-form input carrying the CSRF token.
pub const TOKEN_INPUT_NAME: &str = "token";

/// A results grid is the first `<table>` carrying any of these classes.
pub const RESULTS_TABLE_CLASSES: [&str; 3] = ["table", "data", "table_results"];

/// Leading `<td>` cells of every data row reserved for the row checkbox and
/// the edit/copy/delete actions.
pub const ADMIN_COLUMN_COUNT: usize = 4;

static TOKEN_INPUT: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(&format!(r#"input[name="{TOKEN_INPUT_NAME}"]"#)).expect("token selector")
});
static RESULTS_TABLE: Lazy<Selector> = Lazy::new(|| {
    let alternatives = RESULTS_TABLE_CLASSES
        .iter()
        .map(|class| format!("table.{class}"))
        .collect::<Vec<_>>()
        .join(", ");
    Selector::parse(&alternatives).expect("table selector")
});
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("row selector"));
static HEADER_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("th").expect("th selector"));
static DATA_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("td selector"));

/// Expected markup that was not found.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("login page has no <input name=\"token\"> element")]
    TokenInputMissing,
    #[error("token input has no value attribute")]
    TokenValueMissing,
    #[error("no results table (class table/data/table_results) on the page")]
    ResultsTableMissing,
    #[error("results table has no rows")]
    HeaderRowMissing,
}

/// Reads the CSRF token from the login page.
pub fn extract_token(html: &str) -> Result<String, ExtractionError> {
    let document = Html::parse_document(html);
    let input = document
        .select(&TOKEN_INPUT)
        .next()
        .ok_or(ExtractionError::TokenInputMissing)?;
    input
        .value()
        .attr("value")
        .map(str::to_string)
        .ok_or(ExtractionError::TokenValueMissing)
}

/// Reads headers and rows out of the first results grid on the page.
///
/// Header cells with blank text (icon-only columns) are dropped. Every later
/// row loses its first [`ADMIN_COLUMN_COUNT`] `<td>` cells; a row with fewer
/// cells than that comes back empty rather than failing.
pub fn extract_table(html: &str) -> Result<TableResult, ExtractionError> {
    let document = Html::parse_document(html);
    let table = document
        .select(&RESULTS_TABLE)
        .next()
        .ok_or(ExtractionError::ResultsTableMissing)?;

    let mut rows = table.select(&ROW);
    let header_row = rows.next().ok_or(ExtractionError::HeaderRowMissing)?;

    let headers: Vec<String> = header_row
        .select(&HEADER_CELL)
        .map(cell_text)
        .filter(|text| !text.is_empty())
        .collect();

    let rows: Vec<Vec<String>> = rows
        .map(|row| {
            row.select(&DATA_CELL)
                .skip(ADMIN_COLUMN_COUNT)
                .map(cell_text)
                .collect::<Vec<_>>()
        })
        .collect();

    Ok(TableResult { headers, rows })
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}
