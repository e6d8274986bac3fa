//! Startup checks against the backing spreadsheet.

use crate::state::AppState;
use anyhow::{Context, Result};

/// Verify the store is reachable and create any missing catalog tables.
///
/// Runs before the listener is bound so a misconfigured spreadsheet fails
/// startup instead of the first request.
pub async fn ensure_tables(state: &AppState) -> Result<()> {
    state
        .store
        .health_check()
        .await
        .context("backing store health check failed")?;

    let title = state
        .store
        .document_title()
        .await
        .context("failed to read document title")?;
    tracing::info!(
        backend = state.store.backend_name(),
        document = %title,
        "Connected to spreadsheet"
    );

    let handles = liftsheet_tables::ensure_catalog(&state.tables)
        .await
        .context("failed to provision catalog tables")?;
    for handle in &handles {
        tracing::debug!(table = %handle.title, sheet_id = handle.sheet_id, "Table ready");
    }
    Ok(())
}
