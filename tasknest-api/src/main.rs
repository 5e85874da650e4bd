//! # TaskNest API Server
//!
//! Multi-user task tracker over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! JWT_SECRET=change-me-to-at-least-32-characters cargo run -p tasknest-api
//! ```
//!
//! Set `LOG_FORMAT=json` for structured log output.

use tasknest_api::{
    app::{build_router, AppState},
    config::Config,
};
use tasknest_shared::db::{pool, schema};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    tracing::info!(
        "TaskNest API Server v{} starting...",
        tasknest_shared::VERSION
    );

    let config = Config::from_env()?;

    let db = pool::create_pool(config.database.clone()).await?;
    schema::ensure_schema(&db).await?;

    let addr = config.bind_address();
    let state = AppState::new(db.clone(), config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool::close_pool(db).await;
    tracing::info!("Shutdown complete");

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tasknest_api=debug,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
