/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT issuance and verification
/// - [`middleware`]: Access gate resolving a bearer token to a user
///
/// # Example
///
/// ```
/// use tasknest_shared::auth::password::{hash_password, verify_password};
/// use tasknest_shared::auth::jwt::{issue_token, verify_token, JwtKeys};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash));
///
/// let keys = JwtKeys::from_secret("your-secret-key-at-least-32-bytes-long");
/// let token = issue_token("user@example.com", None, &keys)?;
/// assert_eq!(verify_token(&token, &keys)?, "user@example.com");
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
