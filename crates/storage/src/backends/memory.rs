//! In-memory spreadsheet backend.

use crate::backends::document::Document;
use crate::error::StorageResult;
use crate::traits::{RawRow, SheetInfo, SheetStore};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::instrument;

/// Process-local spreadsheet document. Contents are lost when dropped.
pub struct MemoryBackend {
    document: RwLock<Document>,
}

impl MemoryBackend {
    /// Create an empty document.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            document: RwLock::new(Document::new(title)),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new("liftsheet")
    }
}

#[async_trait]
impl SheetStore for MemoryBackend {
    async fn document_title(&self) -> StorageResult<String> {
        Ok(self.document.read().await.title.clone())
    }

    async fn list_sheets(&self) -> StorageResult<Vec<SheetInfo>> {
        Ok(self.document.read().await.list_sheets())
    }

    #[instrument(skip(self, header), fields(backend = "memory"))]
    async fn add_sheet(&self, title: &str, header: &[String]) -> StorageResult<SheetInfo> {
        self.document.write().await.add_sheet(title, header)
    }

    #[instrument(skip(self), fields(backend = "memory"))]
    async fn delete_sheet(&self, title: &str) -> StorageResult<()> {
        self.document.write().await.delete_sheet(title)
    }

    async fn header_row(&self, title: &str) -> StorageResult<RawRow> {
        self.document.read().await.header_row(title)
    }

    async fn rows(&self, title: &str) -> StorageResult<Vec<RawRow>> {
        self.document.read().await.rows(title)
    }

    #[instrument(skip(self, row), fields(backend = "memory"))]
    async fn append_row(&self, title: &str, row: RawRow) -> StorageResult<()> {
        self.document.write().await.append_row(title, row)
    }

    #[instrument(skip(self, row), fields(backend = "memory"))]
    async fn update_row(&self, title: &str, index: usize, row: RawRow) -> StorageResult<()> {
        self.document.write().await.update_row(title, index, row)
    }

    #[instrument(skip(self), fields(backend = "memory"))]
    async fn delete_row(&self, title: &str, index: usize) -> StorageResult<()> {
        self.document.write().await.delete_row(title, index)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;

    #[tokio::test]
    async fn sheet_lifecycle() {
        let store = MemoryBackend::new("gym");
        assert_eq!(store.document_title().await.unwrap(), "gym");

        let header = vec!["id".to_string(), "name".to_string()];
        store.add_sheet("Exercises", &header).await.unwrap();
        store
            .append_row("Exercises", vec!["1".to_string(), "Squat".to_string()])
            .await
            .unwrap();

        assert_eq!(store.header_row("Exercises").await.unwrap(), header);
        assert_eq!(store.rows("Exercises").await.unwrap().len(), 1);

        store.delete_sheet("Exercises").await.unwrap();
        assert!(store.list_sheets().await.unwrap().is_empty());
        assert!(matches!(
            store.rows("Exercises").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn health_check_succeeds() {
        MemoryBackend::default().health_check().await.unwrap();
    }
}
