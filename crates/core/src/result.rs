//! Backend-agnostic query results and the response envelope.

use serde::{Deserialize, Serialize};

/// One normalized row: field name to JSON-compatible value.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Backend-agnostic output of a single query.
///
/// Holds no reference back to the intent or adapter internals; the
/// orchestrator hands it to the caller by value.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct NormalizedResult {
    /// Identifier of the backend that produced the rows.
    pub backend: String,

    /// Table/collection/index actually queried.
    pub resource: String,

    /// Ordered sequence of opaque records.
    pub rows: Vec<Record>,

    /// Always equals `rows.len()`; kept explicit for transport consumers.
    pub count: usize,

    /// True iff served from the cache without invoking an adapter.
    pub from_cache: bool,

    /// Wall-clock time spent resolving this query, in milliseconds.
    pub execution_time_ms: f64,
}

impl NormalizedResult {
    /// Build a result, deriving `count` from the rows.
    pub fn new(backend: &str, resource: &str, rows: Vec<Record>, from_cache: bool, execution_time_ms: f64) -> Self {
        Self {
            backend: backend.to_string(),
            resource: resource.to_string(),
            count: rows.len(),
            rows,
            from_cache,
            execution_time_ms,
        }
    }
}

/// What gets serialized into the cache: the rows plus enough context to
/// rebuild a [`NormalizedResult`] on replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedResult {
    pub backend: String,
    pub resource: String,
    pub rows: Vec<Record>,
}

/// Response envelope handed to the transport layer.
///
/// Exactly one of `results` / `error` is meaningful at a time.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct QueryResponse {
    pub success: bool,
    pub results: Vec<NormalizedResult>,
    pub error: Option<String>,
}

impl QueryResponse {
    pub fn ok(result: NormalizedResult) -> Self {
        Self { success: true, results: vec![result], error: None }
    }

    pub fn failure(message: String) -> Self {
        Self { success: false, results: Vec::new(), error: Some(message) }
    }
}
