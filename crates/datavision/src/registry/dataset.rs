//! Stored dataset and its lightweight listing projection.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::input::{DecodedTable, SourceInfo};
use crate::value::CellValue;

/// One record: column name to cell, in header order.
///
/// A column missing from the map reads as [`CellValue::Absent`].
pub type Row = IndexMap<String, CellValue>;

/// An ingested table. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Column names in file order.
    pub headers: Vec<String>,
    /// Typed data rows.
    pub rows: Vec<Row>,
    /// Name the file was uploaded under.
    pub file_name: String,
    /// When the dataset was ingested.
    pub upload_time: DateTime<Utc>,
    /// Details about the uploaded bytes, if decoded from a file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceInfo>,
}

impl Dataset {
    /// Create a dataset stamped with the current time.
    pub fn new(headers: Vec<String>, rows: Vec<Row>, file_name: impl Into<String>) -> Self {
        Self {
            headers,
            rows,
            file_name: file_name.into(),
            upload_time: Utc::now(),
            source: None,
        }
    }

    /// Create a dataset from a decoder's output.
    pub fn from_table(table: DecodedTable, file_name: impl Into<String>) -> Self {
        Self {
            source: table.source,
            ..Self::new(table.headers, table.rows, file_name)
        }
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Listing projection under the given id.
    pub fn summary(&self, id: &str) -> DatasetSummary {
        DatasetSummary {
            id: id.to_string(),
            file_name: self.file_name.clone(),
            upload_time: self.upload_time,
            row_count: self.rows.len(),
            headers: self.headers.clone(),
        }
    }
}

/// Listing entry for a stored dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    pub id: String,
    pub file_name: String,
    pub upload_time: DateTime<Utc>,
    pub row_count: usize,
    pub headers: Vec<String>,
}
