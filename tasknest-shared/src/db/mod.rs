/// Database layer for TaskNest
///
/// # Modules
///
/// - `pool`: SQLite connection pool management with health checks
/// - `schema`: Idempotent table creation at startup
/// - Models are in the `models` module at crate root level
///
/// # Example
///
/// ```no_run
/// use tasknest_shared::db::pool::{create_pool, DatabaseConfig};
/// use tasknest_shared::db::schema::ensure_schema;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = create_pool(DatabaseConfig::default()).await?;
///     ensure_schema(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod pool;
pub mod schema;
