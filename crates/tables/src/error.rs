//! Table layer error types.

use liftsheet_storage::StorageError;
use thiserror::Error;

/// Errors raised by the table layer and the entity services.
#[derive(Debug, Error)]
pub enum TableError {
    /// Missing or malformed input. Always detected before any store I/O.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A table or an entity is absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// Routine membership add for an exercise that is already a member.
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// A record carries a field the table header does not define.
    #[error("field '{field}' is not a column of table {table}")]
    SchemaMismatch { table: String, field: String },

    /// Failure surfaced by the backing store.
    #[error("backing store error: {0}")]
    Store(#[from] StorageError),
}

impl From<liftsheet_core::Error> for TableError {
    fn from(err: liftsheet_core::Error) -> Self {
        match err {
            liftsheet_core::Error::Validation(msg) => TableError::Validation(msg),
        }
    }
}

impl TableError {
    /// Map a store error for a table lookup, turning a missing sheet into
    /// [`TableError::NotFound`].
    pub(crate) fn from_lookup(err: StorageError, table: &str) -> Self {
        match err {
            StorageError::NotFound(_) => TableError::NotFound(format!("table {table}")),
            other => TableError::Store(other),
        }
    }
}

/// Result type for table operations.
pub type TableResult<T> = std::result::Result<T, TableError>;
