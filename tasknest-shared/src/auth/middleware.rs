/// Access gate: bearer token → authenticated user
///
/// Every protected route goes through [`authenticate`]. The gate:
///
/// 1. Reads the `Authorization: Bearer <token>` header
/// 2. Verifies the token signature and expiry
/// 3. Looks up the token subject (an email) in the users table
/// 4. Returns an [`AuthContext`] for handlers to read the caller from
///
/// Each failure has its own [`AuthError`] variant so it can be logged, but
/// callers are expected to collapse all of them except `DatabaseError` into
/// one generic 401 response.
///
/// # Example
///
/// ```no_run
/// use axum::http::HeaderMap;
/// use sqlx::SqlitePool;
/// use tasknest_shared::auth::{jwt::JwtKeys, middleware::authenticate};
///
/// # async fn example(pool: SqlitePool, keys: JwtKeys, headers: HeaderMap) {
/// match authenticate(&pool, &keys, &headers).await {
///     Ok(auth) => println!("caller is {}", auth.email),
///     Err(e) => println!("rejected: {}", e),
/// }
/// # }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::jwt::{verify_token, JwtError, JwtKeys};
use crate::models::user::User;

/// Authorization scheme accepted by the gate, matched case-insensitively
pub const BEARER_SCHEME: &str = "Bearer";

/// Authenticated caller, added to request extensions by the API layer
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use tasknest_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User {} ({})", auth.user_id, auth.email)
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: i64,

    /// Authenticated user email (the token subject)
    pub email: String,
}

impl AuthContext {
    /// Creates auth context for a resolved user
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
        }
    }
}

/// Error type for the access gate
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header, or not a Bearer credential
    #[error("Missing credentials")]
    MissingCredentials,

    /// Token failed signature, format or expiry checks
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] JwtError),

    /// Token is valid but its subject has no user record
    #[error("Token subject does not match any user")]
    UnknownSubject,

    /// Database error while resolving the subject
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Extracts the bearer token from request headers
///
/// # Errors
///
/// `AuthError::MissingCredentials` if the header is absent, not valid
/// UTF-8, uses another scheme, or carries an empty token.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let (scheme, token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim_start().split_once(' '))
        .ok_or(AuthError::MissingCredentials)?;

    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(AuthError::MissingCredentials);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    Ok(token)
}

/// Resolves a bearer token to its user record
///
/// # Errors
///
/// - `AuthError::InvalidToken` if verification fails
/// - `AuthError::UnknownSubject` if no user has the subject email
/// - `AuthError::DatabaseError` if the lookup fails
pub async fn resolve_user(pool: &SqlitePool, keys: &JwtKeys, token: &str) -> Result<User, AuthError> {
    let email = verify_token(token, keys)?;

    User::find_by_email(pool, &email)
        .await?
        .ok_or(AuthError::UnknownSubject)
}

/// Runs the full gate over request headers
pub async fn authenticate(
    pool: &SqlitePool,
    keys: &JwtKeys,
    headers: &HeaderMap,
) -> Result<AuthContext, AuthError> {
    let token = bearer_token(headers)?;
    let user = resolve_user(pool, keys, token).await?;

    Ok(AuthContext::from_user(&user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_auth_context_from_user() {
        let user = User {
            id: 42,
            email: "a@x.com".to_string(),
            password_hash: "hash".to_string(),
        };

        let context = AuthContext::from_user(&user);

        assert_eq!(context.user_id, 42);
        assert_eq!(context.email, "a@x.com");
    }

    #[test]
    fn test_bearer_token_extracted() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_bearer_scheme_is_case_insensitive() {
        for value in ["bearer abc.def.ghi", "BEARER abc.def.ghi", "BeArEr abc.def.ghi"] {
            let headers = headers_with(value);
            assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
        }
    }

    #[test]
    fn test_bearer_token_without_token_part() {
        let headers = headers_with("Bearer");
        assert!(matches!(bearer_token(&headers), Err(AuthError::MissingCredentials)));

        let headers = headers_with("Bearerabc.def.ghi");
        assert!(matches!(bearer_token(&headers), Err(AuthError::MissingCredentials)));
    }

    #[test]
    fn test_bearer_token_missing_header() {
        let headers = HeaderMap::new();
        assert!(matches!(bearer_token(&headers), Err(AuthError::MissingCredentials)));
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let headers = headers_with("Basic dXNlcjpwYXNz");
        assert!(matches!(bearer_token(&headers), Err(AuthError::MissingCredentials)));
    }

    #[test]
    fn test_bearer_token_empty() {
        let headers = headers_with("Bearer ");
        assert!(matches!(bearer_token(&headers), Err(AuthError::MissingCredentials)));
    }
}
