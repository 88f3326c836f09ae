//! Task CRUD endpoints under `/todos`.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tasklist_tasks::{Task, TaskId};

/// Body of `POST /todos`
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    /// Raw title; trimmed and validated by the service
    #[serde(default)]
    pub title: String,
}

/// Body of `DELETE /todos`
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClearCompletedResponse {
    /// Number of completed tasks deleted
    pub removed: usize,
}

/// `GET /todos` - every task, newest first
///
/// # Errors
///
/// 500 if the store fails.
pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, AppError> {
    Ok(Json(state.service.list().await?))
}

/// `POST /todos` - create a task
///
/// # Errors
///
/// 400 for a malformed body or an empty/over-long title, 500 if the store fails.
pub async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let Json(request) = body?;
    let task = state.service.create(&request.title).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// `PUT /todos/:id/toggle` - flip completion
///
/// # Errors
///
/// 404 for an unknown id, 500 if the store fails.
pub async fn toggle_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, AppError> {
    let task = state.service.toggle(&TaskId::from(id)).await?;
    Ok(Json(task))
}

/// `DELETE /todos/:id` - delete one task
///
/// # Errors
///
/// 404 for an unknown id, 500 if the store fails.
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.service.remove(&TaskId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /todos` - delete every completed task
///
/// # Errors
///
/// 500 if the store fails.
pub async fn clear_completed(
    State(state): State<AppState>,
) -> Result<Json<ClearCompletedResponse>, AppError> {
    let removed = state.service.clear_completed().await?;
    Ok(Json(ClearCompletedResponse { removed }))
}
