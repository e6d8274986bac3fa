//! Entity services: business rules over the CRUD adapter.

pub mod exercises;
pub mod routines;
pub mod series;

pub use exercises::ExerciseService;
pub use routines::RoutineService;
pub use series::SeriesService;

use crate::cache::CachedRows;
use crate::error::{TableError, TableResult};
use std::sync::Arc;

/// Rewrite a `NotFound` into "<entity> <id> not found".
pub(crate) fn not_found_as<'a>(
    entity: &'a str,
    id: &'a str,
) -> impl FnOnce(TableError) -> TableError + 'a {
    move |err| match err {
        TableError::NotFound(_) => TableError::NotFound(format!("{entity} {id} not found")),
        other => other,
    }
}

/// Treat a table that was never created as having no rows.
pub(crate) fn absent_table_is_empty(result: TableResult<CachedRows>) -> TableResult<CachedRows> {
    match result {
        Err(TableError::NotFound(_)) => Ok(Arc::new(Vec::new())),
        other => other,
    }
}
