/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use tasknest_api::{app::AppState, config::Config};
/// use tasknest_shared::db::pool::create_pool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(config.database.clone()).await?;
/// let state = AppState::new(pool, config)?;
/// let app = tasknest_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tasknest_shared::auth::{jwt::JwtKeys, middleware::authenticate};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into every handler via Axum's `State` extractor. Configuration
/// and keys sit behind `Arc` and are never mutated after startup.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,

    /// JWT signing and verification keys
    pub keys: Arc<JwtKeys>,
}

impl AppState {
    /// Creates new application state
    ///
    /// # Errors
    ///
    /// Fails if the configured JWT algorithm cannot be used.
    pub fn new(db: SqlitePool, config: Config) -> anyhow::Result<Self> {
        let keys = config.jwt.keys()?;

        Ok(Self {
            db,
            config: Arc::new(config),
            keys: Arc::new(keys),
        })
    }

    /// Lifetime of tokens issued at login
    pub fn access_token_ttl(&self) -> chrono::Duration {
        self.config.jwt.access_token_ttl()
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health          # Health check (public)
/// ├── POST /signup          # Create account (public)
/// ├── POST /login           # Form login, returns bearer token (public)
/// ├── GET  /users/me        # Caller's profile and tasks (auth)
/// └── /tasks                # (auth)
///     ├── POST /            # Create task
///     ├── GET  /            # List own tasks
///     └── PUT  /:id         # Replace own task
/// ```
///
/// # Middleware Stack
///
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Access gate (protected routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login));

    let protected_routes = Router::new()
        .route(
            "/tasks",
            post(routes::tasks::create_task).get(routes::tasks::list_tasks),
        )
        .route("/tasks/:task_id", put(routes::tasks::update_task))
        .route("/users/me", get(routes::users::me))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// Access gate layer
///
/// Resolves the bearer token to a user and injects an `AuthContext` into
/// request extensions. Any failure short-circuits with a generic 401.
async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_context = authenticate(&state.db, &state.keys, req.headers()).await?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
