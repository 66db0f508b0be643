//! Application configuration loaded from environment variables.

use crate::errors::{ApiError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite database file
    pub database_url: String,
    /// Port for the REST API server
    pub api_port: u16,
    /// Base URL of the token price service (e.g. https://price.internal)
    pub price_api_url: String,
    /// Optional webhook receiving post-commit notifications; notifications
    /// are logged and dropped when unset
    pub notify_webhook_url: Option<String>,
    /// Timeout in seconds for outbound HTTP calls
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            database_url: env_var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./bountyboard.db".to_string()),
            api_port: env_var("API_PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid API_PORT".to_string()))?,
            price_api_url: env_var("PRICE_API_URL").map_err(|_| {
                ApiError::Config("PRICE_API_URL environment variable is required".to_string())
            })?,
            notify_webhook_url: env_var("NOTIFY_WEBHOOK_URL").ok(),
            http_timeout_secs: env_var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid HTTP_TIMEOUT_SECS".to_string()))?,
        })
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| ApiError::Config(format!("Missing env var: {key}")))
}
