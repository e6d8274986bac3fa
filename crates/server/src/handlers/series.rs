//! Series handlers.

use crate::error::ApiResult;
use crate::handlers::common::{MessageResponse, read_json};
use crate::metrics::record_write;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use liftsheet_core::{NewSeries, Series, SeriesPatch};

/// GET /api/series
pub async fn list_series(State(state): State<AppState>) -> ApiResult<Json<Vec<Series>>> {
    Ok(Json(state.series.list().await?))
}

/// POST /api/series
pub async fn create_series(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<(StatusCode, Json<Series>)> {
    let body: NewSeries = read_json(&state, req).await?;
    let series = state.series.create(body).await?;
    record_write("series", "create");
    Ok((StatusCode::CREATED, Json(series)))
}

/// GET /api/series/{id}
pub async fn get_series(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Series>> {
    Ok(Json(state.series.get(&id).await?))
}

/// PUT /api/series/{id}
pub async fn update_series(
    State(state): State<AppState>,
    Path(id): Path<String>,
    req: Request,
) -> ApiResult<Json<Series>> {
    let patch: SeriesPatch = read_json(&state, req).await?;
    let series = state.series.update(&id, patch).await?;
    record_write("series", "update");
    Ok(Json(series))
}

/// DELETE /api/series/{id}
pub async fn delete_series(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.series.delete(&id).await?;
    record_write("series", "delete");
    Ok(Json(MessageResponse::new("Series deleted successfully")))
}
