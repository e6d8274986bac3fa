//! Spreadsheet-as-database layer for liftsheet.
//!
//! This crate provides:
//! - A sheet registry that resolves and lazily provisions tables
//! - A row codec between positional rows and named records
//! - A TTL read-through cache with whole-table invalidation
//! - A CRUD adapter addressing rows by their `id` column
//! - Entity services for exercises, sets, routines, and series

pub mod adapter;
pub mod cache;
pub mod codec;
pub mod error;
pub mod models;
pub mod registry;
pub mod schema;
pub mod services;

pub use adapter::{ID_COLUMN, TableAdapter};
pub use cache::{CacheStats, TableCache, spawn_cleanup_task};
pub use codec::{Record, decode, encode};
pub use error::{TableError, TableResult};
pub use models::TableRow;
pub use registry::{SheetRegistry, TableHandle};
pub use schema::{Catalog, TableSchema};
pub use services::{ExerciseService, RoutineService, SeriesService};

use liftsheet_core::config::CacheConfig;
use liftsheet_storage::SheetStore;
use std::sync::Arc;
use tracing::info;

/// Build the adapter for the default catalog over `store`.
pub fn from_config(store: Arc<dyn SheetStore>, config: &CacheConfig) -> TableAdapter {
    TableAdapter::new(store, TableCache::new(config), Catalog::default())
}

/// Create every catalog table that does not exist yet.
pub async fn ensure_catalog(tables: &TableAdapter) -> TableResult<Vec<TableHandle>> {
    let mut handles = Vec::new();
    for schema in tables.catalog().tables() {
        let handle = tables.registry().ensure(schema.name, &schema.header()).await?;
        handles.push(handle);
    }
    info!(tables = handles.len(), "Catalog tables ready");
    Ok(handles)
}
