//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

use fedquery_core::{CacheDb, Orchestrator};

use crate::tools::purge::purge_impl;
use crate::tools::query::{QueryParams, query_impl};

/// The main MCP server handler for fedquery.
#[derive(Clone)]
pub struct FedQueryServer {
    orchestrator: Arc<Orchestrator>,
    cache: CacheDb,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl FedQueryServer {
    /// Create a new server handler.
    pub fn new(orchestrator: Arc<Orchestrator>, cache: CacheDb) -> Self {
        Self { orchestrator, cache, tool_router: Self::tool_router() }
    }

    /// Run a federated query expressed in plain English.
    #[tool(
        description = "Run a plain-English query against the federated backends. Returns a JSON response document with normalized rows; repeated queries are served from cache while fresh."
    )]
    async fn query(&self, params: Parameters<QueryParams>) -> Result<CallToolResult, McpError> {
        query_impl(&self.orchestrator, params.0).await
    }

    /// Reclaim expired cache rows.
    #[tool(description = "Delete expired query cache entries. Returns the number of rows removed.")]
    async fn cache_purge(&self) -> Result<CallToolResult, McpError> {
        purge_impl(&self.cache).await
    }
}

impl ServerHandler for FedQueryServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "fedquery".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
