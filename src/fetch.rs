//! Table page retrieval.

use url::Url;

use crate::auth::Token;
use crate::config::TableTarget;
use crate::extract::extract_table;
use crate::pacing::Pacing;
use crate::scrape::ScrapeResult;
use crate::session::Session;
use crate::table::TableResult;

/// Route that selects the database in the server-side session.
pub const STRUCTURE_ROUTE: &str = "/database/structure";

/// Route that renders a table's rows as a results grid.
pub const SQL_ROUTE: &str = "/sql";

/// `index.php?route=/database/structure&db=..&token=..`
pub fn structure_url(base_url: &Url, target: &TableTarget, token: &Token) -> ScrapeResult<Url> {
    let mut url = base_url.join("index.php")?;
    url.query_pairs_mut()
        .append_pair("route", STRUCTURE_ROUTE)
        .append_pair("db", &target.database)
        .append_pair("token", token.as_str());
    Ok(url)
}

/// `index.php?route=/sql&db=..&table=..&token=..`
pub fn table_url(base_url: &Url, target: &TableTarget, token: &Token) -> ScrapeResult<Url> {
    let mut url = base_url.join("index.php")?;
    url.query_pairs_mut()
        .append_pair("route", SQL_ROUTE)
        .append_pair("db", &target.database)
        .append_pair("table", &target.table)
        .append_pair("token", token.as_str());
    Ok(url)
}

/// Opens the database, then the table, and extracts its grid.
pub async fn fetch_table(
    session: &Session,
    base_url: &Url,
    target: &TableTarget,
    token: &Token,
    pacing: &Pacing,
) -> ScrapeResult<TableResult> {
    // Only primes the server-side session; the page itself is not needed.
    session.get(structure_url(base_url, target, token)?).await?;

    pacing.pause().await;

    let page = session.get(table_url(base_url, target, token)?).await?;
    let table = extract_table(page.body())?;
    log::info!(
        "extracted {} columns and {} rows from {}.{}",
        table.width(),
        table.rows.len(),
        target.database,
        target.table
    );
    Ok(table)
}
