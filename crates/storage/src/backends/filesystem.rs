//! Local filesystem spreadsheet backend.
//!
//! The whole document lives in one JSON file. Every mutation rewrites the
//! file atomically (temp file, fsync, rename).

use crate::backends::document::Document;
use crate::error::{StorageError, StorageResult};
use crate::traits::{RawRow, SheetInfo, SheetStore};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Spreadsheet document persisted as a JSON file.
pub struct FilesystemBackend {
    path: PathBuf,
    /// Serializes read-modify-write cycles on the file.
    document: Mutex<Document>,
}

impl FilesystemBackend {
    /// Open the document at `path`, creating it with `title` if missing.
    pub async fn new(path: impl AsRef<Path>, title: &str) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let document = match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<Document>(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "creating new spreadsheet document");
                let document = Document::new(title);
                write_atomic(&path, &document).await?;
                document
            }
            Err(e) => return Err(StorageError::Io(e)),
        };

        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    /// Apply `f` to a copy of the document and persist it. The in-memory
    /// document only changes once the file write succeeded.
    async fn mutate<T>(
        &self,
        f: impl FnOnce(&mut Document) -> StorageResult<T>,
    ) -> StorageResult<T> {
        let mut guard = self.document.lock().await;
        let mut next = guard.clone();
        let out = f(&mut next)?;
        write_atomic(&self.path, &next).await?;
        *guard = next;
        Ok(out)
    }
}

async fn write_atomic(path: &Path, document: &Document) -> StorageResult<()> {
    let data = serde_json::to_vec_pretty(document)?;

    // Unique temp name so a crashed writer never clobbers a live temp file.
    let temp_name = format!(".tmp.{}", Uuid::new_v4());
    let temp_path = path.with_file_name(
        path.file_name()
            .map(|n| format!("{}{}", n.to_string_lossy(), temp_name))
            .unwrap_or_else(|| temp_name.clone()),
    );
    let result = persist(&temp_path, path, &data).await;
    if result.is_err() {
        let _ = fs::remove_file(&temp_path).await;
    }
    result
}

async fn persist(temp_path: &Path, path: &Path, data: &[u8]) -> StorageResult<()> {
    {
        let mut file = fs::File::create(temp_path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
    }
    fs::rename(temp_path, path).await?;
    Ok(())
}

#[async_trait]
impl SheetStore for FilesystemBackend {
    async fn document_title(&self) -> StorageResult<String> {
        Ok(self.document.lock().await.title.clone())
    }

    async fn list_sheets(&self) -> StorageResult<Vec<SheetInfo>> {
        Ok(self.document.lock().await.list_sheets())
    }

    #[instrument(skip(self, header), fields(backend = "filesystem"))]
    async fn add_sheet(&self, title: &str, header: &[String]) -> StorageResult<SheetInfo> {
        self.mutate(|doc| doc.add_sheet(title, header)).await
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn delete_sheet(&self, title: &str) -> StorageResult<()> {
        self.mutate(|doc| doc.delete_sheet(title)).await
    }

    async fn header_row(&self, title: &str) -> StorageResult<RawRow> {
        self.document.lock().await.header_row(title)
    }

    async fn rows(&self, title: &str) -> StorageResult<Vec<RawRow>> {
        self.document.lock().await.rows(title)
    }

    #[instrument(skip(self, row), fields(backend = "filesystem"))]
    async fn append_row(&self, title: &str, row: RawRow) -> StorageResult<()> {
        self.mutate(|doc| doc.append_row(title, row)).await
    }

    #[instrument(skip(self, row), fields(backend = "filesystem"))]
    async fn update_row(&self, title: &str, index: usize, row: RawRow) -> StorageResult<()> {
        self.mutate(|doc| doc.update_row(title, index, row)).await
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn delete_row(&self, title: &str, index: usize) -> StorageResult<()> {
        self.mutate(|doc| doc.delete_row(title, index)).await
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }
}
