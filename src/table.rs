//! Scraped table representation.

/// Header row plus data rows, each row positionally aligned with `headers`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableResult {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// A row whose width differs from the header count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MisalignedRow {
    pub index: usize,
    pub width: usize,
}

impl TableResult {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows that do not line up with the headers, usually a sign the grid
    /// layout changed under the extractor.
    pub fn misaligned_rows(&self) -> Vec<MisalignedRow> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.len() != self.headers.len())
            .map(|(index, row)| MisalignedRow {
                index,
                width: row.len(),
            })
            .collect()
    }
}
