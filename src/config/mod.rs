/// Configuration management for the HyperEasy builder service
///
/// Handles server binding, the data directory, simulator timing and the
/// optional Discord webhook.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Execution simulator configuration
    pub simulator: SimulatorConfig,
    /// Outbound notification configuration
    pub notifications: NotificationConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Server port number
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Directory holding hypereasy.db (default: "data")
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Seconds between simulator ticks
    pub tick_interval_secs: u64,
    /// Number of log entries kept
    pub log_capacity: usize,
}

impl SimulatorConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs.max(1))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Discord webhook; notifications are skipped when unset
    pub discord_webhook_url: Option<String>,
}

fn env_or<T: std::str::FromStr>(key: &str, fallback: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(fallback)
}

impl Default for Config {
    /// Default configuration with ENV_VAR support for container deployment
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: std::env::var("HYPEREASY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env_or("HYPEREASY_PORT", 3004),
            },
            database: DatabaseConfig {
                data_dir: std::env::var("HYPEREASY_DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            },
            simulator: SimulatorConfig {
                tick_interval_secs: env_or("HYPEREASY_TICK_SECS", 5),
                log_capacity: env_or("HYPEREASY_LOG_CAPACITY", 10),
            },
            notifications: NotificationConfig {
                discord_webhook_url: std::env::var("DISCORD_WEBHOOK_URL")
                    .ok()
                    .filter(|url| !url.trim().is_empty()),
            },
        }
    }
}
