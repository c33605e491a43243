//! CSV export and console report.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::scrape::ScrapeResult;
use crate::table::TableResult;

/// Column separator used by the console report.
pub const REPORT_SEPARATOR: &str = " | ";

/// Writes the table to `path` as UTF-8 CSV, replacing any existing file.
pub fn export_csv(table: &TableResult, path: impl AsRef<Path>) -> ScrapeResult<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_csv(table, file)?;
    log::info!("wrote {} rows to {}", table.rows.len(), path.display());
    Ok(())
}

/// Header line first, then one record per row. Rows are written at whatever
/// width they have.
pub fn write_csv<W: Write>(table: &TableResult, writer: W) -> ScrapeResult<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(writer);

    csv_writer.write_record(&table.headers)?;
    for row in &table.rows {
        csv_writer.write_record(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Prints the table on stdout.
pub fn print_report(table: &TableResult) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(table, &mut out)?;
    out.flush()
}

pub fn write_report<W: Write>(table: &TableResult, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", table.headers.join(REPORT_SEPARATOR))?;
    for row in &table.rows {
        writeln!(out, "{}", row.join(REPORT_SEPARATOR))?;
    }
    Ok(())
}
