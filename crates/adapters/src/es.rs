//! HTTP client for the full-text search backend.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use crate::driver::{DriverError, SearchDriver};

/// Connection settings for the search cluster.
#[derive(Debug, Clone)]
pub struct EsConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for EsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9200".to_string(),
            timeout: Duration::from_secs(10),
            user_agent: "fedquery/0.1".to_string(),
        }
    }
}

/// Search client speaking the `_search` HTTP API.
#[derive(Debug, Clone)]
pub struct EsClient {
    http: reqwest::Client,
    config: EsConfig,
}

impl EsClient {
    pub fn new(config: EsConfig) -> Result<Self, DriverError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| DriverError::Unavailable(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    fn endpoint(&self, index: &str) -> Result<url::Url, DriverError> {
        let raw = format!("{}/{index}/_search", self.config.base_url.trim_end_matches('/'));
        url::Url::parse(&raw).map_err(|e| DriverError::Query(format!("invalid search URL {raw:?}: {e}")))
    }
}

#[async_trait]
impl SearchDriver for EsClient {
    async fn search(&self, index: &str, body: &Value) -> Result<Vec<Value>, DriverError> {
        let url = self.endpoint(index)?;
        let started = Instant::now();

        let response = self.http.post(url).json(body).send().await.map_err(|e| {
            if e.is_timeout() {
                DriverError::Timeout
            } else {
                DriverError::Unavailable(e.to_string())
            }
        })?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(DriverError::Unavailable(format!("authentication failed ({status})")));
            }
            StatusCode::NOT_FOUND => {
                return Err(DriverError::Query(format!("index not found: {index}")));
            }
            s if s.is_client_error() || s.is_server_error() => {
                return Err(DriverError::Query(format!("search request failed: HTTP {status}")));
            }
            _ => {}
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| DriverError::Query(format!("failed to decode search response: {e}")))?;

        let hits = payload["hits"]["hits"].as_array().cloned().unwrap_or_default();
        tracing::debug!(
            index = %index,
            hits = hits.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search request completed"
        );
        Ok(hits)
    }
}
