//! Table lookup and provisioning.
//!
//! Handles are cheap snapshots: every call reloads the document's sheet list
//! and the table header, so a header edited out of band is picked up by the
//! next operation.

use crate::error::{TableError, TableResult};
use liftsheet_storage::{SheetStore, StorageError};
use std::sync::Arc;
use tracing::{debug, info};

/// A resolved table and the header it had when resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableHandle {
    pub title: String,
    pub sheet_id: i64,
    pub header: Vec<String>,
}

/// Resolves table names to sheets of the backing document.
#[derive(Clone)]
pub struct SheetRegistry {
    store: Arc<dyn SheetStore>,
}

impl SheetRegistry {
    pub fn new(store: Arc<dyn SheetStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn SheetStore> {
        &self.store
    }

    /// Look up an existing table. Never creates one.
    pub async fn resolve(&self, name: &str) -> TableResult<TableHandle> {
        let sheets = self.store.list_sheets().await?;
        let Some(info) = sheets.into_iter().find(|s| s.title == name) else {
            return Err(TableError::NotFound(format!("table {name}")));
        };
        let header = self
            .store
            .header_row(name)
            .await
            .map_err(|e| TableError::from_lookup(e, name))?;
        Ok(TableHandle {
            title: info.title,
            sheet_id: info.sheet_id,
            header,
        })
    }

    /// Return the table, creating it with `header` if it does not exist.
    ///
    /// An existing table keeps its header even if it differs from `header`.
    pub async fn ensure(&self, name: &str, header: &[String]) -> TableResult<TableHandle> {
        match self.resolve(name).await {
            Ok(handle) => {
                if handle.header != header {
                    debug!(
                        table = name,
                        existing = ?handle.header,
                        requested = ?header,
                        "Table header differs from requested schema; keeping existing header"
                    );
                }
                Ok(handle)
            }
            Err(TableError::NotFound(_)) => match self.store.add_sheet(name, header).await {
                Ok(info) => {
                    info!(table = name, sheet_id = info.sheet_id, "Created table");
                    Ok(TableHandle {
                        title: info.title,
                        sheet_id: info.sheet_id,
                        header: header.to_vec(),
                    })
                }
                // Lost a creation race with another request.
                Err(StorageError::AlreadyExists(_)) => self.resolve(name).await,
                Err(e) => Err(e.into()),
            },
            Err(e) => Err(e),
        }
    }

    /// Delete a table and all of its rows.
    pub async fn delete(&self, name: &str) -> TableResult<()> {
        self.store
            .delete_sheet(name)
            .await
            .map_err(|e| TableError::from_lookup(e, name))?;
        info!(table = name, "Deleted table");
        Ok(())
    }
}
