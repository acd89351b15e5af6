//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `JWT_SECRET` - Token signing secret (min 32 chars, no placeholders)
//! - `DATABASE_URL` - `PostgreSQL` connection string (required unless
//!   `STORE_BACKEND=memory`)
//!
//! ## Optional
//! - `SERVER_HOST` - Bind address (default: 127.0.0.1)
//! - `SERVER_PORT` - Listen port (default: 8080)
//! - `STORE_BACKEND` - `postgres` (default) or `memory`
//! - `JWT_EXPIRATION_MINUTES` - Token lifetime (default: 1440)
//! - `JWT_ISSUER` - Token issuer claim (default: clientele)
//! - `CORS_ALLOWED_ORIGINS` - Comma-separated origin list (default: any)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance sample rate (default: 1.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

const MIN_SECRET_LENGTH: usize = 32;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Which [`CustomerStore`](crate::db::CustomerStore) backend to run.
///
/// Chosen once at startup; the rest of the process only ever sees the
/// trait object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// `PostgreSQL` via sqlx. Requires `DATABASE_URL`.
    Postgres,
    /// List-backed store seeded with development fixtures.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "postgres" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store backend: {other}")),
        }
    }
}

/// Token signing configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HS256 signing secret.
    pub secret: SecretString,
    /// Token lifetime in minutes.
    pub expiration_minutes: i64,
    /// Issuer claim stamped into and required from every token.
    pub issuer: String,
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` connection URL (contains password). `None` only with
    /// the memory backend.
    pub database_url: Option<SecretString>,
    /// IP address to bind the server to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Active store backend.
    pub store_backend: StoreBackend,
    /// Token signing configuration.
    pub jwt: JwtConfig,
    /// CORS origin allowlist. Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
    /// Sentry DSN for error tracking.
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production").
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0).
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0).
    pub sentry_traces_sample_rate: f32,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid,
    /// or if the JWT secret fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let store_backend = get_env_or_default("STORE_BACKEND", "postgres")
            .parse::<StoreBackend>()
            .map_err(|e| ConfigError::InvalidEnvVar("STORE_BACKEND".to_owned(), e))?;

        let database_url = match store_backend {
            StoreBackend::Postgres => Some(SecretString::from(get_required_env("DATABASE_URL")?)),
            StoreBackend::Memory => get_optional_env("DATABASE_URL").map(SecretString::from),
        };

        let host = get_env_or_default("SERVER_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SERVER_HOST".to_owned(), e.to_string()))?;
        let port = get_env_or_default("SERVER_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SERVER_PORT".to_owned(), e.to_string()))?;

        let jwt_secret = get_required_env("JWT_SECRET")?;
        validate_secret_strength(&jwt_secret, "JWT_SECRET")?;
        let jwt = JwtConfig {
            secret: SecretString::from(jwt_secret),
            expiration_minutes: get_env_or_default("JWT_EXPIRATION_MINUTES", "1440")
                .parse::<i64>()
                .map_err(|e| {
                    ConfigError::InvalidEnvVar("JWT_EXPIRATION_MINUTES".to_owned(), e.to_string())
                })?,
            issuer: get_env_or_default("JWT_ISSUER", "clientele"),
        };

        let cors_allowed_origins =
            parse_origin_list(&get_env_or_default("CORS_ALLOWED_ORIGINS", ""));

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            database_url,
            host,
            port,
            store_backend,
            jwt,
            cors_allowed_origins,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns a reference to the token signing configuration.
    #[must_use]
    pub const fn jwt(&self) -> &JwtConfig {
        &self.jwt
    }
}

/// Split a comma-separated origin list, dropping empty entries.
fn parse_origin_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

fn get_required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))
}

fn get_env_or_default(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_owned())
}

fn get_optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Reject secrets that are too short or look like placeholders.
fn validate_secret_strength(value: &str, name: &str) -> Result<(), ConfigError> {
    if value.len() < MIN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            name.to_owned(),
            format!("must be at least {MIN_SECRET_LENGTH} characters"),
        ));
    }

    let lowered = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lowered.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                name.to_owned(),
                format!("contains placeholder pattern \"{pattern}\""),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_store_backend_from_str() {
        assert_eq!("postgres".parse::<StoreBackend>().unwrap(), StoreBackend::Postgres);
        assert_eq!("memory".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert!("redis".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_parse_origin_list() {
        assert!(parse_origin_list("").is_empty());
        assert_eq!(
            parse_origin_list("http://localhost:4200, http://localhost:5173"),
            vec!["http://localhost:4200", "http://localhost:5173"]
        );
        assert_eq!(parse_origin_list("a,,b"), vec!["a", "b"]);
    }

    #[test]
    fn test_validate_secret_rejects_short_values() {
        assert!(validate_secret_strength("short", "TEST").is_err());
    }

    #[test]
    fn test_validate_secret_rejects_placeholders() {
        let result = validate_secret_strength(
            "your-signing-key-goes-here-please-rotate",
            "TEST",
        );
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_accepts_strong_values() {
        assert!(validate_secret_strength("kJ8vN2mQ9xR4tW7yB1cD5fG0hL3pZ6aE9sU2iO5k", "TEST").is_ok());
    }
}
