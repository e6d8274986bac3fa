//! Storage error types.

use thiserror::Error;

/// Backing store operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sheet not found: {0}")]
    NotFound(String),

    #[error("sheet already exists: {0}")]
    AlreadyExists(String),

    #[error("row {index} out of range for sheet {sheet} ({len} rows)")]
    RowOutOfRange {
        sheet: String,
        index: usize,
        len: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("document encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("spreadsheet API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
