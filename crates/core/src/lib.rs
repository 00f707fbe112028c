//! Core types and orchestration for fedquery.
//!
//! This crate provides:
//! - The structured query intent model
//! - Deterministic cache-key derivation and the SQLite-backed cache store
//! - The backend adapter seam and static registry
//! - The query orchestrator (cache-aside dispatch)
//! - Unified error taxonomy and configuration

pub mod adapter;
pub mod cache;
pub mod config;
pub mod error;
pub mod intent;
pub mod orchestrator;
pub mod result;

pub use adapter::{AdapterRegistry, BackendAdapter};
pub use cache::{CacheDb, CacheStore, intent_cache_key};
pub use config::AppConfig;
pub use error::{AdapterError, CacheError, Error};
pub use intent::{Backend, Conditions, Intent, Operation, Sort, SortOrder};
pub use orchestrator::{IntentParser, IntentValidator, Orchestrator};
pub use result::{NormalizedResult, QueryResponse, Record};
