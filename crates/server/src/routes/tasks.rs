use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, patch, post},
};
use db::models::{Task, TaskFilter, TaskStatus};
use serde::Deserialize;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError, routes::parse_param};

#[derive(Debug, Default, Deserialize)]
pub struct TaskQuery {
    pub domain: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub task_type: Option<String>,
}

impl TaskQuery {
    fn into_filter(self) -> Result<TaskFilter, ApiError> {
        Ok(TaskFilter {
            domain: parse_param("domain", self.domain.as_deref())?,
            status: parse_param("status", self.status.as_deref())?,
            task_type: parse_param("type", self.task_type.as_deref())?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

pub async fn get_tasks(
    State(state): State<AppState>,
    Query(query): Query<TaskQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Task>>>, ApiError> {
    let filter = query.into_filter()?;
    let tasks = state.store().get_tasks_filtered(&filter).await;
    Ok(ResponseJson(ApiResponse::success(tasks)))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    let task = state
        .store()
        .get_task(&task_id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Task '{}' not found", task_id)))?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

/// Reviewer decision. `rejected` moves the task to the archive.
pub async fn update_task_status(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    let status: TaskStatus = payload.status.parse()?;
    let task = state
        .store()
        .review_task(&task_id, status)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task '{}' not found", task_id)))?;

    tracing::info!(task_id = %task.id, %status, "Task reviewed");
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn archive_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    let task = state
        .store()
        .archive_task(&task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task '{}' not found", task_id)))?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn get_archived_tasks(
    State(state): State<AppState>,
    Query(query): Query<TaskQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Task>>>, ApiError> {
    let filter = query.into_filter()?;
    let tasks = state.store().get_archived_tasks_filtered(&filter).await;
    Ok(ResponseJson(ApiResponse::success(tasks)))
}

pub async fn clear_archived_tasks(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    state.store().clear_archived_tasks().await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    let task_id_router = Router::new()
        .route("/", get(get_task))
        .route("/status", patch(update_task_status))
        .route("/archive", post(archive_task));

    let inner = Router::new()
        .route("/", get(get_tasks))
        .route("/archived", get(get_archived_tasks).delete(clear_archived_tasks))
        .nest("/{task_id}", task_id_router);

    Router::new().nest("/tasks", inner)
}
