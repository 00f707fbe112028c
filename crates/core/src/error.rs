//! Unified error types for fedquery.
//!
//! [`Error`] is the orchestrator's terminal taxonomy: every variant maps to a
//! single human-readable message attached to the query response. Cache-layer
//! failures use the separate [`CacheError`] and are never surfaced to callers.

use tokio_rusqlite::rusqlite;

use crate::intent::Operation;

/// Terminal failure kinds for a single query.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input text was empty or whitespace-only.
    #[error("EMPTY_QUERY: No query provided")]
    EmptyQuery,

    /// The intent parser could not produce a structured intent.
    #[error("PARSE_ERROR: {0}")]
    Parse(String),

    /// The parsed intent failed validation; carries all violations joined.
    #[error("VALIDATION_FAILED: {0}")]
    ValidationFailed(String),

    /// The intent names a backend outside the registry.
    #[error("UNSUPPORTED_BACKEND: {0}")]
    UnsupportedBackend(String),

    /// The native driver call failed; backend name and cause preserved.
    #[error("BACKEND_EXECUTION: {backend}: {cause}")]
    BackendExecution { backend: String, cause: String },
}

/// Failure inside an adapter, wrapped into [`Error::BackendExecution`] by the
/// orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// The underlying driver rejected or failed the native query.
    #[error("driver error: {0}")]
    Driver(String),

    /// The adapter only builds select queries.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(Operation),

    /// The intent asked for something the adapter cannot express safely,
    /// e.g. a projection field that is not a plain identifier.
    #[error("invalid query shape: {0}")]
    InvalidQuery(String),
}

/// Cache store failures. Degrade silently: a get-failure is a miss, a
/// put-failure is logged and ignored.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Database operation failed.
    #[error("cache database error: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("cache migration failed: {0}")]
    MigrationFailed(String),

    /// Cached payload could not be decoded.
    #[error("cache payload corrupt: {0}")]
    Corrupt(String),
}

impl From<tokio_rusqlite::Error<CacheError>> for CacheError {
    fn from(err: tokio_rusqlite::Error<CacheError>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => CacheError::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => CacheError::Database(tokio_rusqlite::Error::Close(c)),
            _ => CacheError::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for CacheError {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        CacheError::Database(err)
    }
}

impl From<rusqlite::Error> for CacheError {
    fn from(err: rusqlite::Error) -> Self {
        CacheError::Database(tokio_rusqlite::Error::Error(err))
    }
}
