/// User profile endpoint and the public user view
///
/// The public view never carries the password hash. `is_active` is always
/// true: accounts cannot be deactivated.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use tasknest_shared::{auth::middleware::AuthContext, models::task::Task};

/// Public view of a user
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID
    pub id: i64,

    /// Email address
    pub email: String,

    /// Account status
    pub is_active: bool,

    /// Tasks owned by the user
    pub tasks: Vec<Task>,
}

impl UserResponse {
    /// Builds the public view for an active user
    pub fn new(id: i64, email: String, tasks: Vec<Task>) -> Self {
        Self {
            id,
            email,
            is_active: true,
            tasks,
        }
    }
}

/// Current user with their tasks
///
/// ```text
/// GET /users/me
/// Authorization: Bearer <token>
/// ```
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<UserResponse>> {
    let tasks = Task::list_by_owner(&state.db, auth.user_id).await?;

    Ok(Json(UserResponse::new(auth.user_id, auth.email, tasks)))
}
