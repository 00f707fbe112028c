//! Structured errors for the fedquery server boundary.
//!
//! Query failures never surface here; the orchestrator folds them into the
//! response document. These cover tool-level failures only.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Structured errors for the fedquery server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Invalid tool input or output serialization failure.
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// A cache maintenance operation failed.
    #[error("CACHE_FAILED: {0}")]
    CacheFailed(String),
}

impl From<fedquery_core::CacheError> for ServerError {
    fn from(err: fedquery_core::CacheError) -> Self {
        ServerError::CacheFailed(err.to_string())
    }
}

impl From<ServerError> for McpError {
    fn from(err: ServerError) -> Self {
        let (code, message) = match &err {
            ServerError::InvalidInput(msg) => (-32602, msg.clone()),
            ServerError::CacheFailed(msg) => (-32000, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
