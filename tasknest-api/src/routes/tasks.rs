/// Task endpoints
///
/// All routes sit behind the access gate and only ever touch the caller's
/// own tasks. A task that belongs to someone else answers exactly like one
/// that does not exist.
///
/// # Endpoints
///
/// - `POST /tasks` - Create a task
/// - `GET /tasks` - List the caller's tasks in creation order
/// - `PUT /tasks/:task_id` - Replace title, description and completion

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use tasknest_shared::{
    auth::middleware::AuthContext,
    models::task::{CreateTask, Task, UpdateTask},
};
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Initial completion state (default false)
    #[serde(default)]
    pub is_completed: bool,
}

/// Update task request
///
/// Full replacement: `description` omitted means cleared.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// New description
    pub description: Option<String>,

    /// New completion state
    pub is_completed: bool,
}

/// Create a task owned by the caller
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
/// - `422 Unprocessable Entity`: Invalid title
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let task = Task::create(
        &state.db,
        CreateTask {
            owner_id: auth.user_id,
            title: req.title,
            description: req.description,
            is_completed: req.is_completed,
        },
    )
    .await?;

    tracing::debug!(task_id = task.id, owner_id = auth.user_id, "Task created");

    Ok(Json(task))
}

/// List the caller's tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list_by_owner(&state.db, auth.user_id).await?;

    Ok(Json(tasks))
}

/// Replace one of the caller's tasks
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: No task with this ID owned by the caller
/// - `422 Unprocessable Entity`: Invalid title
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<i64>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let task = Task::update_owned(
        &state.db,
        task_id,
        auth.user_id,
        UpdateTask {
            title: req.title,
            description: req.description,
            is_completed: req.is_completed,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    tracing::debug!(task_id = task.id, owner_id = auth.user_id, "Task updated");

    Ok(Json(task))
}
