//! Configuration Module
//!
//! Handles loading the facade configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// Default TTL applied to writes without an explicit TTL, in seconds.
pub const DEFAULT_TTL_SECS: u64 = 60 * 60;

/// Facade configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Redis host name or address
    pub redis_host: String,
    /// Redis port
    pub redis_port: u16,
    /// Password sent with AUTH after connecting (None = no AUTH)
    pub redis_password: Option<String>,
    /// Redis logical database index
    pub redis_db: i64,
    /// Default TTL in seconds for writes without explicit TTL (0 = no expiry)
    pub default_ttl: u64,
    /// Connection heartbeat interval in seconds
    pub heartbeat_interval: u64,
    /// Report cache hits and misses on the console
    pub console_logging: bool,
    /// Append cache hits and misses to this file as JSON lines
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_HOST` - Redis host (default: 127.0.0.1)
    /// - `REDIS_PORT` - Redis port (default: 6379)
    /// - `REDIS_PASSWORD` - AUTH password (default: unset)
    /// - `REDIS_DB` - Database index (default: 0)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 3600)
    /// - `HEARTBEAT_INTERVAL` - Heartbeat frequency in seconds (default: 5)
    /// - `CACHE_LOG_CONSOLE` - `true`/`1` to log hits and misses (default: false)
    /// - `CACHE_LOG_FILE` - Path of the JSON-lines hit/miss log (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            redis_host: env::var("REDIS_HOST")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.redis_host),
            redis_port: env::var("REDIS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.redis_port),
            redis_password: env::var("REDIS_PASSWORD").ok().filter(|v| !v.is_empty()),
            redis_db: env::var("REDIS_DB")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.redis_db),
            default_ttl: env::var("DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_ttl),
            heartbeat_interval: env::var("HEARTBEAT_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.heartbeat_interval),
            console_logging: env::var("CACHE_LOG_CONSOLE")
                .ok()
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.console_logging),
            log_file: env::var("CACHE_LOG_FILE")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Builds the `redis://host:port/db` address for the Redis client.
    pub fn connection_url(&self) -> String {
        format!(
            "redis://{}:{}/{}",
            self.redis_host, self.redis_port, self.redis_db
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_host: "127.0.0.1".to_string(),
            redis_port: 6379,
            redis_password: None,
            redis_db: 0,
            default_ttl: DEFAULT_TTL_SECS,
            heartbeat_interval: 5,
            console_logging: false,
            log_file: None,
        }
    }
}
