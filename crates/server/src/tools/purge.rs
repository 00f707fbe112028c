//! cache_purge tool implementation.
//!
//! The query path relies on passive expiry alone; this tool reclaims the
//! expired rows on demand.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use fedquery_core::CacheDb;

use crate::error::ServerError;

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of expired entries deleted.
    pub deleted: u64,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(cache: &CacheDb) -> Result<CallToolResult, McpError> {
    let deleted = cache.purge_expired().await.map_err(ServerError::from)?;
    tracing::info!(deleted, "purged expired cache entries");

    let output = CachePurgeOutput { deleted };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| ServerError::InvalidInput(format!("failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
