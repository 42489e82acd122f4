//! Application settings loaded from environment variables.

use std::env;
use std::path::Path;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    DOTENV_FILE, ENV_DEVELOPMENT, ENV_PRODUCTION, MIN_JWT_SECRET_LENGTH, SERVICE_ROLE_KEY_VAR,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: Option<String>,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    pub environment: String,
    pub release: String,
    pub error_tracking_url: Option<String>,
    error_tracking_token: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &self.redis_url.as_ref().map(|_| "[REDACTED]"))
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("environment", &self.environment)
            .field("release", &self.release)
            .field("error_tracking_url", &self.error_tracking_url)
            .field("error_tracking_token", &"[REDACTED]")
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set or is too short (security requirement).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            redis_url: non_empty_var("REDIS_URL"),
            jwt_secret,
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            environment: env::var("APP_ENV").unwrap_or_else(|_| ENV_DEVELOPMENT.to_string()),
            release: env::var("APP_RELEASE")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            error_tracking_url: non_empty_var("ERROR_TRACKING_URL"),
            error_tracking_token: non_empty_var("ERROR_TRACKING_TOKEN"),
        }
    }

    /// Build a configuration for tests without touching the environment.
    pub fn for_tests(environment: &str) -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            redis_url: None,
            jwt_secret: "test-secret-key-for-testing-only-32chars".to_string(),
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            environment: environment.to_string(),
            release: "test".to_string(),
            error_tracking_url: None,
            error_tracking_token: None,
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Bearer token for the external tracking service, if any.
    pub fn error_tracking_token(&self) -> Option<&str> {
        self.error_tracking_token.as_deref()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn is_production(&self) -> bool {
        self.environment == ENV_PRODUCTION
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Read the service-role key at call time.
///
/// The process environment wins; otherwise the `.env` file in the working
/// directory is parsed for the key.
pub fn service_role_key() -> Option<String> {
    non_empty_var(SERVICE_ROLE_KEY_VAR).or_else(|| read_dotenv_key(DOTENV_FILE, SERVICE_ROLE_KEY_VAR))
}

/// Look up a single key in a dotenv file without mutating the environment.
pub fn read_dotenv_key(path: impl AsRef<Path>, key: &str) -> Option<String> {
    let entries = dotenvy::from_path_iter(path.as_ref()).ok()?;
    entries
        .filter_map(Result::ok)
        .find(|(name, _)| name == key)
        .map(|(_, value)| value)
        .filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_dotenv_key_finds_value() {
        let path = env::temp_dir().join(format!("obra-catalog-{}.env", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "# comment").unwrap();
        writeln!(file, "OTHER=1").unwrap();
        writeln!(file, "SERVICE_ROLE_KEY=\"abc123\"").unwrap();
        drop(file);

        assert_eq!(read_dotenv_key(&path, "SERVICE_ROLE_KEY").as_deref(), Some("abc123"));
        assert_eq!(read_dotenv_key(&path, "MISSING"), None);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_read_dotenv_key_missing_file() {
        assert_eq!(read_dotenv_key("/nonexistent/.env", "SERVICE_ROLE_KEY"), None);
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = Config::for_tests("production");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("test-secret-key"));
        assert!(config.is_production());
    }
}
