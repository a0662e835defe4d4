use anyhow::Context;
use std::{env, time::Duration};

/// Server configuration loaded from environment variables.
///
/// The signing secret has no default: a missing `AUTH_SECRET_KEY` is a
/// startup error, never a baked-in production value.
#[derive(Debug, Clone)]
pub struct Config {
    // Server settings
    pub server_host: String,
    pub server_port: u16,

    // Database settings
    pub database_url: String,

    // Redis settings
    pub redis_url: String,

    // CORS settings
    pub cors_allowed_origins: Vec<String>,

    // Token signing settings
    pub auth_secret_key: String,
    pub auth_token_algorithm: String,
    pub access_token_ttl_minutes: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Ok(Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            redis_url: env::var("REDIS_URL").context("REDIS_URL must be set")?,
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|origin| origin.trim().to_string())
                        .filter(|origin| !origin.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            auth_secret_key: env::var("AUTH_SECRET_KEY")
                .context("AUTH_SECRET_KEY must be set")?,
            auth_token_algorithm: env::var("AUTH_TOKEN_ALGORITHM")
                .unwrap_or_else(|_| "HS256".to_string()),
            access_token_ttl_minutes: env::var("ACCESS_TOKEN_TTL_MINUTES")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("ACCESS_TOKEN_TTL_MINUTES must be an integer")?,
        })
    }

    /// Single source of truth for the token validity window: drives both the
    /// embedded expiry claim and the liveness-record TTL.
    pub fn access_token_ttl(&self) -> Duration {
        Duration::from_secs(self.access_token_ttl_minutes * 60)
    }
}
