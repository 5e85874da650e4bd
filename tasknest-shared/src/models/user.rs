/// User model and database operations
///
/// Users are created on signup and never updated or deleted. The email is
/// the login name and the JWT subject; uniqueness is enforced by the schema
/// and comparison is case-sensitive (SQLite `BINARY` collation).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     email TEXT NOT NULL UNIQUE,
///     password_hash TEXT NOT NULL
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use tasknest_shared::models::user::{User, CreateUser};
/// use tasknest_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
///
/// let found = User::find_by_email(&pool, "user@example.com").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use sqlx::SqliteExecutor;

/// User account
///
/// Deliberately not `Serialize`: the password hash must never reach a
/// response body. API handlers build their own public view.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    /// Store-assigned user ID
    pub id: i64,

    /// Email address, unique and case-sensitive
    pub email: String,

    /// Argon2id PHC string
    pub password_hash: String,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Email address
    pub email: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,
}

impl User {
    /// Inserts a new user and returns it with its assigned ID
    ///
    /// # Errors
    ///
    /// Returns a database error if the email already exists (unique
    /// constraint on `users.email`) or the connection fails.
    pub async fn create<'e, E>(executor: E, data: CreateUser) -> Result<Self, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES (?1, ?2)
            RETURNING id, email, password_hash
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .fetch_one(executor)
        .await?;

        Ok(user)
    }

    /// Finds a user by exact email address
    pub async fn find_by_email<'e, E>(executor: E, email: &str) -> Result<Option<Self>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

}
