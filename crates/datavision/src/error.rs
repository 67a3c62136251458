//! Error types for the Data Vision library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Data Vision operations.
#[derive(Debug, Error)]
pub enum DataVisionError {
    /// No dataset is registered under the given id.
    #[error("Dataset not found: {0}")]
    NotFound(String),

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error from the spreadsheet reader.
    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Empty file or no header row.
    #[error("Empty data: {0}")]
    EmptyData(String),
}

impl DataVisionError {
    /// Returns true if this error came out of decoding an uploaded file.
    pub fn is_decode_failure(&self) -> bool {
        matches!(
            self,
            DataVisionError::Csv(_)
                | DataVisionError::Workbook(_)
                | DataVisionError::UnsupportedFormat(_)
                | DataVisionError::EmptyData(_)
        )
    }
}

/// Result type alias for Data Vision operations.
pub type Result<T> = std::result::Result<T, DataVisionError>;
