//! Application configuration with layered loading.
//!
//! Configuration management using figment for layered loading from multiple
//! sources:
//!
//! 1. Environment variables (FEDQUERY_*)
//! 2. TOML config file (if FEDQUERY_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (FEDQUERY_*)
/// 2. TOML config file (if FEDQUERY_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite cache database.
    ///
    /// Set via FEDQUERY_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Path to the embedded SQLite data store backing the relational
    /// adapters in dev mode.
    ///
    /// Set via FEDQUERY_DATA_DB_PATH environment variable.
    #[serde(default = "default_data_db_path")]
    pub data_db_path: PathBuf,

    /// Default TTL for cached query results, in seconds.
    ///
    /// Set via FEDQUERY_CACHE_TTL_SECONDS environment variable.
    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: i64,

    /// Base URL of the full-text search backend (Elasticsearch-compatible).
    ///
    /// Set via FEDQUERY_ES_BASE_URL environment variable. The search backend
    /// is only registered when this is set.
    #[serde(default)]
    pub es_base_url: Option<String>,

    /// Driver request timeout in milliseconds.
    ///
    /// Set via FEDQUERY_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User-Agent string for HTTP-backed drivers.
    ///
    /// Set via FEDQUERY_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./fedquery-cache.sqlite")
}

fn default_data_db_path() -> PathBuf {
    PathBuf::from("./fedquery-data.sqlite")
}

fn default_cache_ttl_seconds() -> i64 {
    3600
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_user_agent() -> String {
    "fedquery/0.1".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            data_db_path: default_data_db_path(),
            cache_ttl_seconds: default_cache_ttl_seconds(),
            es_base_url: None,
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("FEDQUERY_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("FEDQUERY_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
