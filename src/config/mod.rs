//! Configuration module - environment variable parsing

use std::env;
use std::net::SocketAddr;

/// Default look-ahead window for `/bills/upcoming`
pub const DEFAULT_UPCOMING_BILL_DAYS: i64 = 7;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Server binding address
    pub server_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// SQLite connection string, e.g. `sqlite://my_house.db?mode=rwc`
    pub database_url: String,

    /// Days ahead `/bills/upcoming` looks when no `days` query is given
    pub upcoming_bill_days: i64,

    /// Allowed client origins for CORS (comma-separated), `None` allows any
    pub client_origin: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // PORT wins over SERVER_ADDR so hosted platforms can inject it
        let server_addr = if let Ok(port) = env::var("PORT") {
            format!("0.0.0.0:{}", port)
        } else {
            env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string())
        };

        let upcoming_bill_days = match env::var("UPCOMING_BILL_DAYS") {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|days| *days >= 0)
                .ok_or(ConfigError::Invalid("UPCOMING_BILL_DAYS"))?,
            Err(_) => DEFAULT_UPCOMING_BILL_DAYS,
        };

        Ok(Self {
            server_addr: server_addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress)?,

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://my_house.db?mode=rwc".to_string()),

            upcoming_bill_days,

            client_origin: env::var("CLIENT_ORIGIN")
                .ok()
                .filter(|origin| !origin.trim().is_empty()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            log_level: "info".to_string(),
            database_url: "sqlite::memory:".to_string(),
            upcoming_bill_days: DEFAULT_UPCOMING_BILL_DAYS,
            client_origin: None,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Invalid server address format")]
    InvalidAddress,
}
