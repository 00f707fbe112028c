//! fedquery server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

use fedquery_adapters::{EsClient, EsConfig, RelationalAdapter, SearchAdapter, SqliteDriver};
use fedquery_core::{AdapterRegistry, AppConfig, CacheDb, Orchestrator};

mod error;
mod handler;
mod parser;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    tracing::info!("Starting fedquery server on stdio transport");

    let config = AppConfig::load()?;
    let cache = CacheDb::open(&config.db_path).await?;

    let sql_driver = Arc::new(SqliteDriver::open(&config.data_db_path).await?);
    let mut registry = AdapterRegistry::new()
        .register(Arc::new(RelationalAdapter::postgres(sql_driver.clone())))
        .register(Arc::new(RelationalAdapter::mysql(sql_driver)));

    if let Some(base_url) = &config.es_base_url {
        let client = EsClient::new(EsConfig {
            base_url: base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        })?;
        registry = registry.register(Arc::new(SearchAdapter::new(Arc::new(client))));
        tracing::info!(base_url = %base_url, "registered full-text search backend");
    }

    tracing::info!(backends = registry.len(), "adapter registry built");

    let orchestrator = Orchestrator::new(Arc::new(parser::KeywordParser::new()), Arc::new(cache.clone()), registry)
        .with_cache_ttl(config.cache_ttl_seconds);

    let handler = handler::FedQueryServer::new(Arc::new(orchestrator), cache);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
