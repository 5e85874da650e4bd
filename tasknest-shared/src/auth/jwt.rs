/// JWT token issuance and verification
///
/// Access tokens are self-contained: the subject claim is the user's email
/// and `exp` is an absolute Unix timestamp. Nothing is persisted server-side;
/// every request re-verifies the signature and expiry.
///
/// # Security
///
/// - **Algorithms**: HMAC only (HS256 default, HS384, HS512)
/// - **Validation**: signature, expiry (no leeway) and issuer
/// - **Keys**: built once from the configured secret via [`JwtKeys`]
///
/// # Example
///
/// ```
/// use tasknest_shared::auth::jwt::{issue_token, verify_token, JwtKeys};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let keys = JwtKeys::from_secret("your-secret-key-at-least-32-bytes-long");
///
/// let token = issue_token("user@example.com", None, &keys)?;
/// assert_eq!(verify_token(&token, &keys)?, "user@example.com");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Issuer written into and required on every token
pub const ISSUER: &str = "tasknest";

/// Lifetime used when `issue_token` is called without an explicit ttl
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 15;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Signature, format or claim validation failed
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Configured algorithm is unknown or not a symmetric HMAC scheme
    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

/// JWT claims
///
/// - `sub`: user email
/// - `iss`: always [`ISSUER`]
/// - `iat`: issued at (Unix timestamp)
/// - `exp`: expiration (Unix timestamp)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user email
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims expiring after [`DEFAULT_TOKEN_TTL_MINUTES`]
    pub fn new(subject: impl Into<String>) -> Result<Self, JwtError> {
        Self::with_expiration(subject, Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES))
    }

    /// Creates claims expiring `expires_in` from now
    ///
    /// A negative duration produces an already-expired token, which is
    /// occasionally useful in tests.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::CreateError` if the expiry falls outside the
    /// representable date range.
    pub fn with_expiration(subject: impl Into<String>, expires_in: Duration) -> Result<Self, JwtError> {
        let now = Utc::now();
        let expiration = now.checked_add_signed(expires_in).ok_or_else(|| {
            JwtError::CreateError(format!("Token lifetime out of range: {}", expires_in))
        })?;

        Ok(Self {
            sub: subject.into(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        })
    }
}

/// Signing and verification keys plus the algorithm they are used with
///
/// Built once at startup and shared read-only by every request.
#[derive(Clone)]
pub struct JwtKeys {
    algorithm: Algorithm,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    /// Builds keys for an HMAC algorithm
    ///
    /// # Errors
    ///
    /// Returns `JwtError::UnsupportedAlgorithm` for asymmetric algorithms,
    /// which cannot be driven by a shared secret.
    pub fn new(secret: &str, algorithm: Algorithm) -> Result<Self, JwtError> {
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(JwtError::UnsupportedAlgorithm(format!("{:?}", algorithm)));
        }

        Ok(Self {
            algorithm,
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    /// Builds HS256 keys
    pub fn from_secret(secret: &str) -> Self {
        Self {
            algorithm: Algorithm::HS256,
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Algorithm used for signing and required when verifying
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

impl fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtKeys")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

/// Parses an algorithm name such as `"HS256"`
///
/// # Errors
///
/// Returns `JwtError::UnsupportedAlgorithm` if the name is unknown.
pub fn parse_algorithm(name: &str) -> Result<Algorithm, JwtError> {
    Algorithm::from_str(name.trim()).map_err(|_| JwtError::UnsupportedAlgorithm(name.to_string()))
}

/// Signs claims into a compact JWT
pub fn create_token(claims: &Claims, keys: &JwtKeys) -> Result<String, JwtError> {
    let header = Header::new(keys.algorithm);

    encode(&header, claims, &keys.encoding)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT and returns its claims
///
/// Checks the signature against the configured algorithm, the issuer, and
/// that `exp` lies in the future. No leeway is applied.
///
/// # Errors
///
/// `JwtError::Expired` for expired tokens, `JwtError::ValidationError` for
/// everything else (malformed, bad signature, wrong algorithm or issuer).
pub fn validate_token(token: &str, keys: &JwtKeys) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(keys.algorithm);
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &keys.decoding, &validation).map_err(|e| {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
            _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
        }
    })?;

    Ok(token_data.claims)
}

/// Issues a token for `subject`
///
/// `ttl` of `None` falls back to [`DEFAULT_TOKEN_TTL_MINUTES`]. The login
/// flow always passes its configured ttl explicitly.
pub fn issue_token(subject: &str, ttl: Option<Duration>, keys: &JwtKeys) -> Result<String, JwtError> {
    let claims = match ttl {
        Some(ttl) => Claims::with_expiration(subject, ttl)?,
        None => Claims::new(subject)?,
    };

    create_token(&claims, keys)
}

/// Verifies a token and returns its subject
pub fn verify_token(token: &str, keys: &JwtKeys) -> Result<String, JwtError> {
    validate_token(token, keys).map(|claims| claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_default_expiration() {
        let claims = Claims::new("a@x.com").unwrap();

        assert_eq!(claims.sub, "a@x.com");
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.exp - claims.iat, DEFAULT_TOKEN_TTL_MINUTES * 60);
    }

    #[test]
    fn test_claims_with_custom_expiration() {
        let claims = Claims::with_expiration("a@x.com", Duration::minutes(30)).unwrap();

        assert_eq!(claims.exp - claims.iat, 30 * 60);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_claims_expiration_out_of_range() {
        // Far past the last representable date
        let result = Claims::with_expiration("a@x.com", Duration::days(365 * 1_000_000));
        assert!(matches!(result, Err(JwtError::CreateError(_))));

        let keys = JwtKeys::from_secret(SECRET);
        let result = issue_token("a@x.com", Some(Duration::days(365 * 1_000_000)), &keys);
        assert!(matches!(result, Err(JwtError::CreateError(_))));
    }

    #[test]
    fn test_issue_and_verify_token() {
        let keys = JwtKeys::from_secret(SECRET);

        let token = issue_token("b@x.com", None, &keys).expect("Should issue token");
        let subject = verify_token(&token, &keys).expect("Should verify token");

        assert_eq!(subject, "b@x.com");
    }

    #[test]
    fn test_issue_with_explicit_ttl() {
        let keys = JwtKeys::from_secret(SECRET);

        let token = issue_token("b@x.com", Some(Duration::minutes(30)), &keys).unwrap();
        let claims = validate_token(&token, &keys).unwrap();

        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let token = issue_token("a@x.com", None, &JwtKeys::from_secret("secret1")).unwrap();

        let result = verify_token(&token, &JwtKeys::from_secret("wrong-secret"));
        assert!(matches!(result, Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn test_validate_expired_token() {
        let keys = JwtKeys::from_secret(SECRET);

        let claims = Claims::with_expiration("a@x.com", Duration::seconds(-3600)).unwrap();
        assert!(claims.exp < Utc::now().timestamp());

        let token = create_token(&claims, &keys).expect("Should create token");
        let result = validate_token(&token, &keys);

        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_validate_tampered_token() {
        let keys = JwtKeys::from_secret(SECRET);
        let token = issue_token("a@x.com", None, &keys).unwrap();

        // Swap the payload for one claiming a different subject
        let forged_claims = Claims::new("mallory@x.com").unwrap();
        let forged = create_token(&forged_claims, &JwtKeys::from_secret("other-secret")).unwrap();

        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        parts[1] = forged_parts[1];
        let tampered = parts.join(".");

        assert!(verify_token(&tampered, &keys).is_err());
    }

    #[test]
    fn test_validate_malformed_token() {
        let keys = JwtKeys::from_secret(SECRET);

        assert!(verify_token("", &keys).is_err());
        assert!(verify_token("not.a.jwt", &keys).is_err());
        assert!(verify_token("garbage", &keys).is_err());
    }

    #[test]
    fn test_algorithm_mismatch_rejected() {
        let hs256 = JwtKeys::new(SECRET, Algorithm::HS256).unwrap();
        let hs512 = JwtKeys::new(SECRET, Algorithm::HS512).unwrap();

        let token = issue_token("a@x.com", None, &hs512).unwrap();

        assert!(verify_token(&token, &hs256).is_err());
        assert_eq!(verify_token(&token, &hs512).unwrap(), "a@x.com");
    }

    #[test]
    fn test_asymmetric_algorithm_rejected() {
        let result = JwtKeys::new(SECRET, Algorithm::RS256);
        assert!(matches!(result, Err(JwtError::UnsupportedAlgorithm(_))));
    }

    #[test]
    fn test_parse_algorithm() {
        assert_eq!(parse_algorithm("HS256").unwrap(), Algorithm::HS256);
        assert_eq!(parse_algorithm("HS512").unwrap(), Algorithm::HS512);
        assert!(parse_algorithm("NOPE").is_err());
    }

    #[test]
    fn test_keys_debug_hides_secret() {
        let keys = JwtKeys::from_secret(SECRET);
        let rendered = format!("{:?}", keys);

        assert!(rendered.contains("HS256"));
        assert!(!rendered.contains(SECRET));
    }
}
