/// Password hashing module using Argon2id
///
/// Passwords are hashed with Argon2id and stored as PHC strings. The PHC
/// string carries the algorithm, version, cost parameters and salt, so
/// verification never needs to know which parameters produced a hash.
/// Hashes written under older parameters keep verifying after the defaults
/// below are raised.
///
/// # Security
///
/// - **Algorithm**: Argon2id
/// - **Memory**: 64 MB (65536 KB)
/// - **Iterations**: 3 passes
/// - **Parallelism**: 4 lanes
/// - **Salt**: 16 random bytes per hash
///
/// # Example
///
/// ```
/// use tasknest_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("super_secret_password_123")?;
///
/// assert!(verify_password("super_secret_password_123", &hash));
/// assert!(!verify_password("wrong_password", &hash));
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};
use std::sync::OnceLock;

/// Argon2 memory cost in KiB
const MEMORY_COST_KIB: u32 = 65536;

/// Argon2 number of passes
const TIME_COST: u32 = 3;

/// Argon2 lanes
const PARALLELISM: u32 = 4;

/// Hash verified against when a login names no existing account
static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),
}

/// Hashes a password using Argon2id
///
/// A fresh salt is drawn from the OS RNG on every call, so hashing the same
/// password twice yields two different strings that both verify.
///
/// # Returns
///
/// PHC string, e.g. `$argon2id$v=19$m=65536,t=3,p=4$<salt>$<hash>`
///
/// # Errors
///
/// Returns `PasswordError::HashError` if the parameters are rejected or
/// hashing fails.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(MEMORY_COST_KIB)
        .t_cost(TIME_COST)
        .p_cost(PARALLELISM)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a stored PHC hash
///
/// Returns `false` for a wrong password and also for a hash that cannot be
/// parsed or verified; callers only ever see a yes/no answer. Comparison is
/// constant-time.
///
/// # Example
///
/// ```
/// use tasknest_shared::auth::password::verify_password;
///
/// assert!(!verify_password("password", "not-a-phc-string"));
/// ```
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash could not be parsed");
            return false;
        }
    };

    // Parameters come from the PHC string, not from this instance
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => true,
        Err(argon2::password_hash::Error::Password) => false,
        Err(e) => {
            tracing::warn!(error = %e, "Password verification failed");
            false
        }
    }
}

/// Runs a full verification against a throwaway hash and discards the result
///
/// Login calls this when the email is unknown so that the response takes
/// as long as a wrong password against a real account. The hash is built
/// on first use with the same parameters as [`hash_password`].
pub fn verify_password_dummy(password: &str) {
    let dummy = DUMMY_HASH.get_or_init(|| hash_password("tasknest-dummy-password").ok());

    if let Some(hash) = dummy {
        let _ = verify_password(password, hash);
    }
}
