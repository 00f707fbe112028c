//! Configuration validation rules.
//!
//! Validation logic for `AppConfig` values after they have been loaded from
//! environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

const MAX_TTL_SECONDS: i64 = 30 * 24 * 3600;

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `cache_ttl_seconds` is not positive or exceeds 30 days
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - `es_base_url` is set but not http(s)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_ttl_seconds <= 0 {
            return Err(ConfigError::Invalid {
                field: "cache_ttl_seconds".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.cache_ttl_seconds > MAX_TTL_SECONDS {
            return Err(ConfigError::Invalid {
                field: "cache_ttl_seconds".into(),
                reason: "must not exceed 30 days".into(),
            });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if let Some(url) = &self.es_base_url
            && !url.starts_with("http://")
            && !url.starts_with("https://")
        {
            return Err(ConfigError::Invalid {
                field: "es_base_url".into(),
                reason: "must start with http:// or https://".into(),
            });
        }

        Ok(())
    }
}
