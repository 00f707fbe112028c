//! query tool implementation.
//!
//! Runs one federated query end to end through the orchestrator and returns
//! the response document as pretty-printed JSON. Failures are part of the
//! document (`success: false` plus an error message); the transport never
//! re-maps them into protocol errors.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use fedquery_core::Orchestrator;

use crate::error::ServerError;

/// Input parameters for the query tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct QueryParams {
    /// The query, in plain English (e.g. "find users with role admin").
    pub text: String,
}

/// Implementation of the query tool.
pub async fn query_impl(orchestrator: &Orchestrator, params: QueryParams) -> Result<CallToolResult, McpError> {
    let response = orchestrator.handle_query(&params.text).await;

    let json = serde_json::to_string_pretty(&response)
        .map_err(|e| ServerError::InvalidInput(format!("failed to serialize response: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::KeywordParser;
    use fedquery_adapters::{RelationalAdapter, SqliteDriver};
    use fedquery_core::{AdapterRegistry, CacheDb, QueryResponse};
    use std::sync::Arc;

    /// Full stack over an in-memory store: keyword parser, SQLite cache,
    /// SQLite-backed relational adapters.
    async fn orchestrator() -> Orchestrator {
        let driver = Arc::new(SqliteDriver::open_in_memory().await.unwrap());
        driver
            .execute_batch(
                "CREATE TABLE users (username TEXT, role TEXT);
                 INSERT INTO users VALUES ('alice', 'admin');
                 INSERT INTO users VALUES ('bob', 'viewer');",
            )
            .await
            .unwrap();

        let registry = AdapterRegistry::new()
            .register(Arc::new(RelationalAdapter::postgres(driver.clone())))
            .register(Arc::new(RelationalAdapter::mysql(driver)));

        let cache = Arc::new(CacheDb::open_in_memory().await.unwrap());
        Orchestrator::new(Arc::new(KeywordParser::new()), cache, registry)
    }

    async fn run(orchestrator: &Orchestrator, text: &str) -> QueryResponse {
        let result = query_impl(orchestrator, QueryParams { text: text.into() }).await.unwrap();
        let content = serde_json::to_value(&result.content[0]).unwrap();
        let text = content.get("text").and_then(|v| v.as_str()).unwrap();
        serde_json::from_str(text).unwrap()
    }

    #[tokio::test]
    async fn test_query_end_to_end() {
        let orchestrator = orchestrator().await;

        let response = run(&orchestrator, "find users with role admin").await;
        assert!(response.success);
        let result = &response.results[0];
        assert_eq!(result.backend, "postgres");
        assert_eq!(result.resource, "users");
        assert_eq!(result.count, 1);
        assert_eq!(result.rows[0]["username"], "alice");
        assert!(!result.from_cache);
    }

    #[tokio::test]
    async fn test_repeat_query_served_from_cache() {
        let orchestrator = orchestrator().await;

        let cold = run(&orchestrator, "find users with role admin").await;
        let warm = run(&orchestrator, "find users with role admin").await;
        assert!(!cold.results[0].from_cache);
        assert!(warm.results[0].from_cache);
        assert_eq!(warm.results[0].rows, cold.results[0].rows);
    }

    #[tokio::test]
    async fn test_failure_is_a_response_not_an_error() {
        let orchestrator = orchestrator().await;

        // Mongo has no registered adapter in this fixture.
        let response = run(&orchestrator, "show sessions").await;
        assert!(!response.success);
        assert!(response.error.as_deref().unwrap().contains("UNSUPPORTED_BACKEND"));

        let response = run(&orchestrator, "delete users").await;
        assert!(!response.success);
        assert!(response.error.as_deref().unwrap().contains("VALIDATION_FAILED"));

        let response = run(&orchestrator, "").await;
        assert!(!response.success);
        assert!(response.error.as_deref().unwrap().contains("No query provided"));
    }
}
