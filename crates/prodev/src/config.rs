use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryConfig;
use crate::store::BackendPreference;

/// Prodev configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProdevConfig {
    /// Connection settings for both backends
    pub database: DatabaseConfig,

    /// Which backend to use
    pub backend: BackendPreference,

    /// CSV file loaded by `seed`
    pub csv_path: PathBuf,

    /// Log level
    pub log_level: String,

    /// Retry policy for reads
    pub retry: RetrySettings,
}

impl Default for ProdevConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            backend: BackendPreference::Auto,
            csv_path: PathBuf::from("user_data.csv"),
            log_level: "info".to_string(),
            retry: RetrySettings::default(),
        }
    }
}

impl ProdevConfig {
    /// Load from configuration file
    pub fn load_from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

        serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))
    }

    /// Defaults overlaid with `.env` and the `DB_*` environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::default().apply_env()
    }

    /// Overlay `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD` and
    /// `PRODEV_SQLITE_PATH` (after loading `.env` if present).
    pub fn apply_env(mut self) -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        if let Ok(host) = std::env::var("DB_HOST") {
            self.database.host = host;
        }
        if let Ok(port) = std::env::var("DB_PORT") {
            self.database.port = port
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid DB_PORT '{}': {}", port, e))?;
        }
        if let Ok(user) = std::env::var("DB_USER") {
            self.database.user = user;
        }
        if let Ok(password) = std::env::var("DB_PASSWORD") {
            self.database.password = password;
        }
        if let Ok(path) = std::env::var("PRODEV_SQLITE_PATH") {
            self.database.sqlite_path = PathBuf::from(path);
        }

        Ok(self)
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// MySQL host
    pub host: String,

    /// MySQL port
    pub port: u16,

    /// MySQL user
    pub user: String,

    /// MySQL password
    pub password: String,

    /// MySQL database name
    pub name: String,

    /// SQLite file used when MySQL is not available
    pub sqlite_path: PathBuf,

    /// Pool size
    pub max_connections: u32,

    /// How long to wait for a connection before giving up
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            name: "ALX_prodev".to_string(),
            sqlite_path: PathBuf::from("ALX_prodev.sqlite"),
            max_connections: 5,
            connect_timeout_secs: 5,
        }
    }
}

impl DatabaseConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Retry configuration as stored in the config file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Total attempts, including the first
    pub max_attempts: usize,

    /// Pause between attempts in milliseconds
    pub delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 2000,
        }
    }
}

impl From<&RetrySettings> for RetryConfig {
    fn from(settings: &RetrySettings) -> Self {
        RetryConfig::new(
            settings.max_attempts,
            Duration::from_millis(settings.delay_ms),
        )
    }
}
