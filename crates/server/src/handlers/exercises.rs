//! Exercise and workout set handlers.

use crate::error::ApiResult;
use crate::handlers::common::read_json;
use crate::metrics::record_write;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use liftsheet_core::{Exercise, ExercisePatch, NewExercise, NewSet, WorkoutSet};
use serde::Serialize;

/// Response for exercise creation.
#[derive(Debug, Serialize)]
pub struct CreateExerciseResponse {
    pub id: String,
}

/// Response for exercise deletion.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteExerciseResponse {
    pub message: String,
    pub sets_deleted: usize,
}

/// GET /api/exercises
pub async fn list_exercises(State(state): State<AppState>) -> ApiResult<Json<Vec<Exercise>>> {
    Ok(Json(state.exercises.list().await?))
}

/// POST /api/exercises
pub async fn create_exercise(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<(StatusCode, Json<CreateExerciseResponse>)> {
    let body: NewExercise = read_json(&state, req).await?;
    let exercise = state.exercises.create(body).await?;
    record_write("exercise", "create");
    Ok((
        StatusCode::CREATED,
        Json(CreateExerciseResponse { id: exercise.id }),
    ))
}

/// GET /api/exercises/{id}
pub async fn get_exercise(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Exercise>> {
    Ok(Json(state.exercises.get_with_summary(&id).await?))
}

/// PUT /api/exercises/{id}
pub async fn update_exercise(
    State(state): State<AppState>,
    Path(id): Path<String>,
    req: Request,
) -> ApiResult<Json<Exercise>> {
    let patch: ExercisePatch = read_json(&state, req).await?;
    let exercise = state.exercises.update(&id, patch).await?;
    record_write("exercise", "update");
    Ok(Json(exercise))
}

/// DELETE /api/exercises/{id}
///
/// Removes the exercise and then every set recorded for it.
pub async fn delete_exercise(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteExerciseResponse>> {
    let sets_deleted = state.exercises.delete(&id).await?;
    record_write("exercise", "delete");
    Ok(Json(DeleteExerciseResponse {
        message: "Exercise deleted successfully".to_string(),
        sets_deleted,
    }))
}

/// GET /api/exercises/{id}/sets
pub async fn list_sets(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<WorkoutSet>>> {
    Ok(Json(state.exercises.list_sets(&id).await?))
}

/// POST /api/exercises/{id}/sets
pub async fn add_set(
    State(state): State<AppState>,
    Path(id): Path<String>,
    req: Request,
) -> ApiResult<(StatusCode, Json<WorkoutSet>)> {
    let body: NewSet = read_json(&state, req).await?;
    let set = state.exercises.add_set(&id, body).await?;
    record_write("set", "create");
    Ok((StatusCode::CREATED, Json(set)))
}
