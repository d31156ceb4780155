//! Error types for the tabaudit library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for audit operations.
#[derive(Debug, Error)]
pub enum AuditError {
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

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Sheet has zero columns or rows of inconsistent length.
    #[error("Unsupported input shape: {0}")]
    UnsupportedInputShape(String),

    /// A row index outside the sheet's bounds was referenced.
    #[error("Row index {index} is out of bounds for a sheet with {row_count} rows")]
    InvalidRowIndex { index: usize, row_count: usize },

    /// Writing an audit artifact failed.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Result type alias for audit operations.
pub type Result<T> = std::result::Result<T, AuditError>;
