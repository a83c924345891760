//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, DEFAULT_VERIFICATION_TOKEN_HOURS, MIN_JWT_SECRET_LENGTH,
};
use crate::errors::{AppError, AppResult};

/// Secret used only by debug builds when `JWT_SECRET` is unset
const DEV_JWT_SECRET: &str = "dev-secret-key-minimum-32-chars!!";

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub verification_token_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    /// Surface the reason a verification failed instead of a bare 400
    pub verify_detailed_errors: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("verification_token_hours", &self.verification_token_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("verify_detailed_errors", &self.verify_detailed_errors)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env`, if present).
    ///
    /// # Errors
    /// Fails if `JWT_SECRET` is missing in a release build or shorter than
    /// [`MIN_JWT_SECRET_LENGTH`].
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                DEV_JWT_SECRET.to_string()
            }
            Err(_) => {
                return Err(AppError::config(
                    "JWT_SECRET environment variable must be set in production",
                ))
            }
        };

        Self::builder(jwt_secret)
            .database_url(env::var("DATABASE_URL").ok())
            .jwt_expiration_hours(parse_var("JWT_EXPIRATION_HOURS"))
            .verification_token_hours(parse_var("VERIFICATION_TOKEN_HOURS"))
            .server_host(env::var("SERVER_HOST").ok())
            .server_port(parse_var("SERVER_PORT"))
            .verify_detailed_errors(parse_var("VERIFY_DETAILED_ERRORS"))
            .build()
    }

    /// Start building a configuration around the given signing secret.
    pub fn builder(jwt_secret: impl Into<String>) -> ConfigBuilder {
        ConfigBuilder {
            config: Config {
                database_url: DEFAULT_DATABASE_URL.to_string(),
                jwt_secret: jwt_secret.into(),
                jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
                verification_token_hours: DEFAULT_VERIFICATION_TOKEN_HOURS,
                server_host: DEFAULT_SERVER_HOST.to_string(),
                server_port: DEFAULT_SERVER_PORT,
                verify_detailed_errors: false,
            },
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Builder for [`Config`]; `None` keeps the default for that field.
#[derive(Debug)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn database_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.config.database_url = url;
        }
        self
    }

    pub fn jwt_expiration_hours(mut self, hours: Option<i64>) -> Self {
        if let Some(hours) = hours {
            self.config.jwt_expiration_hours = hours;
        }
        self
    }

    pub fn verification_token_hours(mut self, hours: Option<i64>) -> Self {
        if let Some(hours) = hours {
            self.config.verification_token_hours = hours;
        }
        self
    }

    pub fn server_host(mut self, host: Option<String>) -> Self {
        if let Some(host) = host {
            self.config.server_host = host;
        }
        self
    }

    pub fn server_port(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.config.server_port = port;
        }
        self
    }

    pub fn verify_detailed_errors(mut self, enabled: Option<bool>) -> Self {
        if let Some(enabled) = enabled {
            self.config.verify_detailed_errors = enabled;
        }
        self
    }

    /// Validate and finish the configuration.
    pub fn build(self) -> AppResult<Config> {
        if self.config.jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::config(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            )));
        }
        Ok(self.config)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
