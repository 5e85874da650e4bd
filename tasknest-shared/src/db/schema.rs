/// Idempotent schema creation
///
/// There is no migration system. On startup the two tables and the owner
/// index are created if absent; running this against an existing database
/// is a no-op.
///
/// # Example
///
/// ```no_run
/// use tasknest_shared::db::{pool::{create_pool, DatabaseConfig}, schema::ensure_schema};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// ensure_schema(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::SqlitePool;
use tracing::info;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT,
        is_completed BOOLEAN NOT NULL DEFAULT 0,
        owner_id INTEGER NOT NULL REFERENCES users(id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_tasks_owner_id ON tasks (owner_id)",
];

/// Creates the `users` and `tasks` tables if they do not exist
///
/// All statements run in one transaction.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    for statement in SCHEMA {
        sqlx::query(*statement).execute(&mut *tx).await?;
    }

    tx.commit().await?;

    info!("Database schema is ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::{create_pool, DatabaseConfig};

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let pool = create_pool(DatabaseConfig::in_memory()).await.unwrap();

        ensure_schema(&pool).await.expect("first run");
        ensure_schema(&pool).await.expect("second run");

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'tasks') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        let names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();
        assert_eq!(names, vec!["tasks", "users"]);
    }
}
