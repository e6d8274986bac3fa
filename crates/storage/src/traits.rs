//! Storage trait definitions.

use crate::error::StorageResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A positional row of cell values.
pub type RawRow = Vec<String>;

/// A tab of the spreadsheet document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetInfo {
    /// Backend-assigned numeric id (stable for the sheet's lifetime).
    pub sheet_id: i64,
    /// Sheet title, unique within the document.
    pub title: String,
}

/// Spreadsheet document abstraction.
///
/// A document holds sheets; each sheet has a header row (row 1) followed by
/// data rows. Row indexes in this trait are 0-based and count data rows only.
///
/// Implementations perform no locking across calls: a caller that reads rows
/// and then writes by index can race with another writer.
#[async_trait]
pub trait SheetStore: Send + Sync + 'static {
    /// Title of the document. Also serves as the "load document info" step.
    async fn document_title(&self) -> StorageResult<String>;

    /// List the document's sheets in tab order.
    async fn list_sheets(&self) -> StorageResult<Vec<SheetInfo>>;

    /// Add a sheet whose first row is `header`.
    ///
    /// Fails with `AlreadyExists` if a sheet with this title exists.
    async fn add_sheet(&self, title: &str, header: &[String]) -> StorageResult<SheetInfo>;

    /// Delete a sheet and all its rows.
    async fn delete_sheet(&self, title: &str) -> StorageResult<()>;

    /// Read the header row. Empty when the sheet has no header.
    async fn header_row(&self, title: &str) -> StorageResult<RawRow>;

    /// Read all data rows (header excluded).
    ///
    /// Rows may be shorter than the header when trailing cells are empty.
    async fn rows(&self, title: &str) -> StorageResult<Vec<RawRow>>;

    /// Append a data row after the last one.
    async fn append_row(&self, title: &str, row: RawRow) -> StorageResult<()>;

    /// Overwrite the data row at `index`.
    async fn update_row(&self, title: &str, index: usize, row: RawRow) -> StorageResult<()>;

    /// Remove the data row at `index`, shifting later rows up.
    async fn delete_row(&self, title: &str, index: usize) -> StorageResult<()>;

    /// Check that the document is reachable.
    async fn health_check(&self) -> StorageResult<()> {
        self.document_title().await.map(|_| ())
    }

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}
