//! Common test utilities for integration tests
//!
//! Every `TestContext` owns a fresh in-memory SQLite database, so tests
//! never share state and need no cleanup.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tasknest_api::app::{build_router, AppState};
use tasknest_api::config::{ApiConfig, Config, JwtConfig};
use tasknest_shared::auth::jwt::JwtKeys;
use tasknest_shared::db::{pool, schema};
use tower::Service as _;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-secret-key-with-at-least-32-characters";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: SqlitePool,
    pub app: axum::Router,
    pub config: Config,
}

impl TestContext {
    /// Creates a new test context with a fresh database
    pub async fn new() -> anyhow::Result<Self> {
        Self::with_config(test_config()).await
    }

    /// Creates a test context from an explicit configuration
    pub async fn with_config(config: Config) -> anyhow::Result<Self> {
        let db = pool::create_pool(config.database.clone()).await?;
        schema::ensure_schema(&db).await?;

        let state = AppState::new(db.clone(), config.clone())?;
        let app = build_router(state);

        Ok(TestContext { db, app, config })
    }

    /// Keys matching the server's signing configuration
    pub fn keys(&self) -> JwtKeys {
        JwtKeys::from_secret(&self.config.jwt.secret)
    }

    /// Sends a request through the router
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().call(request).await.unwrap()
    }

    /// POST /signup with a JSON body
    pub async fn signup(&self, email: &str, password: &str) -> Response<Body> {
        let request = Request::builder()
            .method("POST")
            .uri("/signup")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "email": email, "password": password }).to_string(),
            ))
            .unwrap();

        self.send(request).await
    }

    /// POST /login with a form body
    pub async fn login(&self, email: &str, password: &str) -> Response<Body> {
        let request = Request::builder()
            .method("POST")
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(
                serde_urlencoded::to_string([("username", email), ("password", password)])
                    .unwrap(),
            ))
            .unwrap();

        self.send(request).await
    }

    /// Signs up a fresh random user and returns (email, access token)
    pub async fn register_and_login(&self) -> (String, String) {
        let email = unique_email();
        let password = "pw1";

        let response = self.signup(&email, password).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = self.login(&email, password).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;

        let token = body["access_token"].as_str().unwrap().to_string();
        (email, token)
    }

    /// Sends a JSON request with an optional bearer token
    pub async fn json_request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }
}

/// Configuration for tests: in-memory database, fixed secret
pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: pool::DatabaseConfig::in_memory(),
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            algorithm: "HS256".to_string(),
            access_token_expire_minutes: 30,
        },
    }
}

/// Configuration backed by a fresh SQLite file in the temp directory
///
/// Returns the config and the file path so the caller can remove it.
pub fn file_backed_config() -> (Config, std::path::PathBuf) {
    let path = std::env::temp_dir().join(format!("tasknest-api-test-{}.db", Uuid::new_v4()));

    let mut config = test_config();
    config.database = pool::DatabaseConfig {
        url: format!("sqlite://{}", path.display()),
        ..Default::default()
    };

    (config, path)
}

/// Random email so tests never collide
pub fn unique_email() -> String {
    format!("test-{}@example.com", Uuid::new_v4())
}

/// Reads a response body as JSON
pub async fn body_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
