/// Task model and database operations
///
/// Every task belongs to exactly one user. All read and write paths that
/// take a task ID also take the caller's user ID and filter on both, so a
/// task owned by someone else is indistinguishable from one that does not
/// exist.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     title TEXT NOT NULL,
///     description TEXT,
///     is_completed BOOLEAN NOT NULL DEFAULT 0,
///     owner_id INTEGER NOT NULL REFERENCES users(id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use tasknest_shared::models::task::{Task, CreateTask, UpdateTask};
/// use tasknest_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example(owner_id: i64) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     owner_id,
///     title: "buy milk".to_string(),
///     description: None,
///     is_completed: false,
/// }).await?;
///
/// let done = Task::update_owned(&pool, task.id, owner_id, UpdateTask {
///     title: task.title.clone(),
///     description: None,
///     is_completed: true,
/// }).await?;
/// assert!(done.map(|t| t.is_completed).unwrap_or(false));
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::SqliteExecutor;

/// Task owned by a single user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Store-assigned task ID
    pub id: i64,

    /// Task title
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Completion flag
    pub is_completed: bool,

    /// Owning user
    pub owner_id: i64,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Owning user (always the authenticated caller)
    pub owner_id: i64,

    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Initial completion state
    pub is_completed: bool,
}

/// Replacement values for an existing task
///
/// Update is a full replace: every field is written, and a `None`
/// description clears any stored one.
#[derive(Debug, Clone)]
pub struct UpdateTask {
    /// New title
    pub title: String,

    /// New description
    pub description: Option<String>,

    /// New completion state
    pub is_completed: bool,
}

impl Task {
    /// Inserts a task and returns it with its assigned ID
    ///
    /// # Errors
    ///
    /// Returns a database error if `owner_id` does not reference an existing
    /// user (foreign keys are enforced) or the connection fails.
    pub async fn create<'e, E>(executor: E, data: CreateTask) -> Result<Self, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, is_completed, owner_id)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, title, description, is_completed, owner_id
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.is_completed)
        .bind(data.owner_id)
        .fetch_one(executor)
        .await?;

        Ok(task)
    }

    /// Lists a user's tasks in insertion order
    pub async fn list_by_owner<'e, E>(executor: E, owner_id: i64) -> Result<Vec<Self>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, is_completed, owner_id
            FROM tasks
            WHERE owner_id = ?1
            ORDER BY id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(executor)
        .await?;

        Ok(tasks)
    }

    /// Replaces a task's fields, only if `owner_id` owns it
    ///
    /// Lookup and write happen in a single statement, so there is no window
    /// between the ownership check and the update.
    ///
    /// # Returns
    ///
    /// The updated task, or `None` if no task matches both `id` and
    /// `owner_id`.
    pub async fn update_owned<'e, E>(
        executor: E,
        id: i64,
        owner_id: i64,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = ?3, description = ?4, is_completed = ?5
            WHERE id = ?1 AND owner_id = ?2
            RETURNING id, title, description, is_completed, owner_id
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.is_completed)
        .fetch_optional(executor)
        .await?;

        Ok(task)
    }
}
