//! Health check handler.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Title of the backing spreadsheet.
    pub document: String,
}

/// GET /api/health
///
/// Unauthenticated; reports 503 when the backing store cannot be reached.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let document = state.store.document_title().await.map_err(|e| {
        tracing::warn!(error = %e, "Backing store health check failed");
        ApiError::Unavailable(format!("backing store unavailable: {e}"))
    })?;

    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        document,
    }))
}
