//! Error types for the Augur library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Augur operations.
#[derive(Debug, Error)]
pub enum AugurError {
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

    /// Error decoding an Excel workbook.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// File extension is neither csv nor xlsx/xls.
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Empty file or no data rows to analyze.
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    /// Chart kind unknown or its column requirement cannot be satisfied.
    #[error("Unsupported chart request: {0}")]
    UnsupportedChartRequest(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Augur operations.
pub type Result<T> = std::result::Result<T, AugurError>;
