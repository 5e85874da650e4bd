/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /signup` - Register a new user (JSON body)
/// - `POST /login` - Exchange email/password for a bearer token (form body)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, INCORRECT_LOGIN},
    routes::users::UserResponse,
};
use axum::{extract::State, Form, Json};
use serde::{Deserialize, Serialize};
use tasknest_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User},
};
use validator::Validate;

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Email address (login name)
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    /// Plaintext password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login form, OAuth2 password-grant style
///
/// Extra OAuth2 fields such as `grant_type` and `scope` are accepted and
/// ignored.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// Email address
    pub username: String,

    /// Plaintext password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Signed access token
    pub access_token: String,

    /// Always "bearer"
    pub token_type: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /signup
/// Content-Type: application/json
///
/// { "email": "a@x.com", "password": "pw1" }
/// ```
///
/// # Response
///
/// ```json
/// { "id": 1, "email": "a@x.com", "is_active": true, "tasks": [] }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Email already registered
/// - `422 Unprocessable Entity`: Empty email or password
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<Json<UserResponse>> {
    req.validate()?;

    let password_hash = password::hash_password(&req.password)?;

    // Single INSERT: the unique index on email decides between concurrent
    // signups, and the loser maps to Conflict
    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User signed up");

    Ok(Json(UserResponse::new(user.id, user.email, Vec::new())))
}

/// Login endpoint
///
/// # Endpoint
///
/// ```text
/// POST /login
/// Content-Type: application/x-www-form-urlencoded
///
/// username=a@x.com&password=pw1
/// ```
///
/// # Response
///
/// ```json
/// { "access_token": "eyJ...", "token_type": "bearer" }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown email or wrong password (same body for both)
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> ApiResult<Json<TokenResponse>> {
    let user = User::find_by_email(&state.db, &form.username).await?;

    let verified = match &user {
        Some(user) => password::verify_password(&form.password, &user.password_hash),
        None => {
            // Same Argon2 cost as a wrong password
            password::verify_password_dummy(&form.password);
            false
        }
    };

    let user = match user {
        Some(user) if verified => user,
        _ => {
            tracing::debug!("Login rejected");
            return Err(ApiError::Unauthorized(INCORRECT_LOGIN.to_string()));
        }
    };

    let access_token = jwt::issue_token(&user.email, Some(state.access_token_ttl()), &state.keys)?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}
