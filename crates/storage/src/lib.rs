//! Spreadsheet storage abstraction and backends for liftsheet.
//!
//! This crate provides:
//! - The [`SheetStore`] trait: a document of titled sheets, each a header row
//!   followed by positional data rows
//! - Backends: in-memory, local JSON file, and Google Sheets

pub mod backends;
pub mod error;
pub mod traits;

pub use backends::{
    filesystem::FilesystemBackend, google::GoogleSheetsBackend, memory::MemoryBackend,
};
pub use error::{StorageError, StorageResult};
pub use traits::{RawRow, SheetInfo, SheetStore};

use liftsheet_core::config::StoreConfig;
use std::sync::Arc;
use std::time::Duration;

/// Create a spreadsheet store from configuration.
pub async fn from_config(config: &StoreConfig) -> StorageResult<Arc<dyn SheetStore>> {
    config.validate().map_err(StorageError::Config)?;

    match config {
        StoreConfig::Memory { title } => Ok(Arc::new(MemoryBackend::new(title.clone()))),
        StoreConfig::Filesystem { path, title } => {
            let backend = FilesystemBackend::new(path, title).await?;
            Ok(Arc::new(backend))
        }
        StoreConfig::Google {
            spreadsheet_id,
            service_account,
            access_token,
            endpoint,
            timeout_secs,
        } => {
            let timeout = Duration::from_secs(*timeout_secs);
            let backend = match (access_token, service_account) {
                (Some(token), _) => {
                    GoogleSheetsBackend::new(endpoint, spreadsheet_id, token, timeout)?
                }
                (None, Some(account)) => GoogleSheetsBackend::with_service_account(
                    endpoint,
                    spreadsheet_id,
                    account,
                    timeout,
                )?,
                (None, None) => {
                    return Err(StorageError::Config(
                        "google store has no credentials".to_string(),
                    ));
                }
            };
            Ok(Arc::new(backend))
        }
    }
}
