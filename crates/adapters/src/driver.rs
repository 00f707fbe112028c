//! Backend driver boundary.
//!
//! Drivers are the out-of-scope edge of the federation layer: they run a
//! native query against a concrete store and hand back raw records. Adapters
//! own query construction and row normalization; drivers own transport,
//! pooling, and timeouts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// A typed scalar as produced by a relational driver.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl From<&SqlValue> for Value {
    fn from(value: &SqlValue) -> Self {
        match value {
            SqlValue::Null => Value::Null,
            SqlValue::Bool(b) => Value::Bool(*b),
            SqlValue::Int(i) => Value::from(*i),
            SqlValue::Float(f) => serde_json::Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
            SqlValue::Text(s) => Value::String(s.clone()),
            // Datetime columns render as ISO-8601.
            SqlValue::Timestamp(ts) => Value::String(ts.to_rfc3339()),
        }
    }
}

/// One raw relational row, in column order.
pub type SqlRow = Vec<(String, SqlValue)>;

/// Native driver failures, wrapped by adapters into the core error taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// The store could not be reached or refused the connection.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The store rejected or failed the query.
    #[error("query failed: {0}")]
    Query(String),

    /// The driver-level timeout elapsed.
    #[error("request timeout")]
    Timeout,
}

/// Relational driver: runs parameterized SQL.
///
/// Values are always bound as parameters; drivers never see interpolated
/// condition values.
#[async_trait]
pub trait SqlDriver: Send + Sync {
    async fn run(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<SqlRow>, DriverError>;
}

/// Document-store driver: runs an equality filter against a collection.
#[async_trait]
pub trait DocumentDriver: Send + Sync {
    async fn find(&self, collection: &str, filter: &Value, limit: Option<u32>) -> Result<Vec<Value>, DriverError>;
}

/// Full-text search driver: runs a query DSL body against an index and
/// returns the raw hits.
#[async_trait]
pub trait SearchDriver: Send + Sync {
    async fn search(&self, index: &str, body: &Value) -> Result<Vec<Value>, DriverError>;
}
