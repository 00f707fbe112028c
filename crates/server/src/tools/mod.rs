//! MCP tool implementations.
//!
//! This module contains all tools exposed by the fedquery server.

pub mod purge;
pub mod query;

pub use purge::CachePurgeOutput;
pub use query::QueryParams;
