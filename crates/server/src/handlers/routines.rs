//! Routine and routine membership handlers.

use crate::error::ApiResult;
use crate::handlers::common::{MessageResponse, read_json};
use crate::metrics::record_write;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use liftsheet_core::{NewRoutine, Routine, RoutineExerciseRequest, RoutinePatch};

/// GET /api/routines
pub async fn list_routines(State(state): State<AppState>) -> ApiResult<Json<Vec<Routine>>> {
    Ok(Json(state.routines.list().await?))
}

/// POST /api/routines
pub async fn create_routine(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<(StatusCode, Json<Routine>)> {
    let body: NewRoutine = read_json(&state, req).await?;
    let routine = state.routines.create(body).await?;
    record_write("routine", "create");
    Ok((StatusCode::CREATED, Json(routine)))
}

/// GET /api/routines/{id}
pub async fn get_routine(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Routine>> {
    Ok(Json(state.routines.get(&id).await?))
}

/// PUT /api/routines/{id}
pub async fn update_routine(
    State(state): State<AppState>,
    Path(id): Path<String>,
    req: Request,
) -> ApiResult<Json<Routine>> {
    let patch: RoutinePatch = read_json(&state, req).await?;
    let routine = state.routines.update(&id, patch).await?;
    record_write("routine", "update");
    Ok(Json(routine))
}

/// DELETE /api/routines/{id}
pub async fn delete_routine(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.routines.delete(&id).await?;
    record_write("routine", "delete");
    Ok(Json(MessageResponse::new("Routine deleted successfully")))
}

/// GET /api/routines/{id}/exercises
///
/// Member exercise ids in routine order.
pub async fn list_routine_exercises(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.routines.list_exercises(&id).await?))
}

/// POST /api/routines/{id}/exercises
pub async fn add_routine_exercise(
    State(state): State<AppState>,
    Path(id): Path<String>,
    req: Request,
) -> ApiResult<(StatusCode, Json<Routine>)> {
    let body: RoutineExerciseRequest = read_json(&state, req).await?;
    let routine = state.routines.add_exercise(&id, body).await?;
    record_write("routine", "add_exercise");
    Ok((StatusCode::CREATED, Json(routine)))
}

/// DELETE /api/routines/{id}/exercises/{exercise_id}
pub async fn remove_routine_exercise(
    State(state): State<AppState>,
    Path((id, exercise_id)): Path<(String, String)>,
) -> ApiResult<Json<Routine>> {
    let routine = state.routines.remove_exercise(&id, &exercise_id).await?;
    record_write("routine", "remove_exercise");
    Ok(Json(routine))
}
