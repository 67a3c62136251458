//! Decoded tables and the metadata recorded about their source bytes.

use serde::{Deserialize, Serialize};

use crate::registry::Row;

/// Metadata about the bytes a table was decoded from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    /// Detected format (csv, tsv, xlsx, etc.).
    pub format: String,
    /// Size of the uploaded content in bytes.
    pub size_bytes: u64,
    /// SHA-256 hash of the uploaded content.
    pub hash: String,
}

/// A rectangular table as handed over by a decoder.
#[derive(Debug, Clone, Default)]
pub struct DecodedTable {
    /// Column headers in file order.
    pub headers: Vec<String>,
    /// Typed rows keyed by header.
    pub rows: Vec<Row>,
    /// Where the table came from, when decoded from a file.
    pub source: Option<SourceInfo>,
}

impl DecodedTable {
    /// Create a table with no source information.
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            headers,
            rows,
            source: None,
        }
    }

    /// Attach source information.
    pub fn with_source(mut self, source: SourceInfo) -> Self {
        self.source = Some(source);
        self
    }

    /// Build a table from raw text records, typing each cell on the way in.
    ///
    /// Cells past the last header are dropped; short records leave the
    /// trailing columns absent.
    pub fn from_records<H, R, C>(headers: H, records: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let rows = records
            .into_iter()
            .map(|record| {
                headers
                    .iter()
                    .zip(record)
                    .map(|(h, raw)| (h.clone(), crate::CellValue::from_raw(raw.as_ref())))
                    .collect()
            })
            .collect();
        Self::new(headers, rows)
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Number of data rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
