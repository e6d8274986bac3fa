//! Application state shared across handlers.

use liftsheet_core::config::AppConfig;
use liftsheet_storage::SheetStore;
use liftsheet_tables::{ExerciseService, RoutineService, SeriesService, TableAdapter};
use std::sync::Arc;

/// Application state. Cloning is cheap; every clone shares the same store
/// and cache.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Backing spreadsheet.
    pub store: Arc<dyn SheetStore>,
    /// CRUD adapter over the store, with the process-wide cache.
    pub tables: TableAdapter,
    pub exercises: ExerciseService,
    pub routines: RoutineService,
    pub series: SeriesService,
}

impl AppState {
    /// Create a new application state.
    pub fn new(config: AppConfig, store: Arc<dyn SheetStore>) -> Self {
        let tables = liftsheet_tables::from_config(store.clone(), &config.cache);
        Self {
            config: Arc::new(config),
            store,
            exercises: ExerciseService::new(tables.clone()),
            routines: RoutineService::new(tables.clone()),
            series: SeriesService::new(tables.clone()),
            tables,
        }
    }
}
