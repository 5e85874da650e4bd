/// Configuration management for the API server
///
/// Configuration is read once at startup from the environment (with an
/// optional `.env` file) and then shared read-only through `AppState`.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8000)
/// - `DATABASE_URL`: SQLite connection string (default: sqlite://tasknest.db)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 5)
/// - `JWT_SECRET`: Secret key for JWT signing (required, at least 32 characters)
/// - `JWT_ALGORITHM`: HS256, HS384 or HS512 (default: HS256)
/// - `ACCESS_TOKEN_EXPIRE_MINUTES`: Lifetime of tokens issued at login (default: 30)
/// - `CORS_ORIGINS`: Comma-separated allowed origins, `*` for any (default: *)
/// - `LOG_FORMAT`: `json` for JSON logs, anything else for text
///
/// # Example
///
/// ```no_run
/// use tasknest_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use std::env;
use tasknest_shared::auth::jwt::{self, JwtKeys};
use tasknest_shared::db::pool::{DatabaseConfig, DEFAULT_DATABASE_URL};

/// Longest accepted login token lifetime (one year)
pub const MAX_ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 365 * 24 * 60;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins (`*` means any)
    pub cors_origins: Vec<String>,
}

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for JWT signing
    ///
    /// Must be at least 32 characters. Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Signing algorithm name
    pub algorithm: String,

    /// Lifetime of tokens issued at login, in minutes
    pub access_token_expire_minutes: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("access_token_expire_minutes", &self.access_token_expire_minutes)
            .finish()
    }
}

impl JwtConfig {
    /// Builds the signing keys for this configuration
    ///
    /// # Errors
    ///
    /// Fails if the algorithm is unknown or not an HMAC algorithm.
    pub fn keys(&self) -> anyhow::Result<JwtKeys> {
        let algorithm = jwt::parse_algorithm(&self.algorithm)?;
        Ok(JwtKeys::new(&self.secret, algorithm)?)
    }

    /// Token lifetime as a duration
    pub fn access_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.access_token_expire_minutes)
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `JWT_SECRET` is missing or shorter than 32 characters
    /// - A numeric variable cannot be parsed
    /// - `JWT_ALGORITHM` is not HS256, HS384 or HS512
    /// - `ACCESS_TOKEN_EXPIRE_MINUTES` is not between 1 and one year
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()?;

        let cors_origins = parse_origins(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()));

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let jwt_algorithm = env::var("JWT_ALGORITHM").unwrap_or_else(|_| "HS256".to_string());

        let access_token_expire_minutes = parse_token_ttl(
            &env::var("ACCESS_TOKEN_EXPIRE_MINUTES").unwrap_or_else(|_| "30".to_string()),
        )?;

        let config = Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
                ..Default::default()
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                algorithm: jwt_algorithm,
                access_token_expire_minutes,
            },
        };

        // Reject a bad algorithm at startup rather than on first login
        config.jwt.keys()?;

        Ok(config)
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Whether any origin may call the API
    pub fn allows_any_origin(&self) -> bool {
        self.api.cors_origins.iter().any(|origin| origin == "*")
    }
}

fn parse_token_ttl(raw: &str) -> anyhow::Result<i64> {
    let minutes = raw.trim().parse::<i64>()?;

    if !(1..=MAX_ACCESS_TOKEN_EXPIRE_MINUTES).contains(&minutes) {
        anyhow::bail!(
            "ACCESS_TOKEN_EXPIRE_MINUTES must be between 1 and {}",
            MAX_ACCESS_TOKEN_EXPIRE_MINUTES
        );
    }

    Ok(minutes)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
