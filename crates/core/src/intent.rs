//! Structured query intent.
//!
//! An [`Intent`] is the backend-agnostic description of a query produced by an
//! external parser. It names the target backend, the operation, and a fixed
//! set of condition slots that each adapter maps onto its own schema
//! vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of backends the federation layer knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Primary relational store (users).
    Postgres,
    /// Document store (sessions).
    Mongo,
    /// Secondary relational store (journals).
    Mysql,
    /// Full-text search store (documents).
    Elasticsearch,
}

impl Backend {
    /// Stable string identifier, also used in cache keys and responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Postgres => "postgres",
            Backend::Mongo => "mongo",
            Backend::Mysql => "mysql",
            Backend::Elasticsearch => "elasticsearch",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "postgres" => Ok(Backend::Postgres),
            "mongo" => Ok(Backend::Mongo),
            "mysql" => Ok(Backend::Mysql),
            "elasticsearch" => Ok(Backend::Elasticsearch),
            other => Err(other.to_string()),
        }
    }
}

/// Query operation. Only `Select` is executable; the rest exist so the parser
/// can classify input and the orchestrator can reject it with a clear message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Select,
    Insert,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Select => "select",
            Operation::Insert => "insert",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three condition slots adapters read.
///
/// These are generic extraction slots, not column names: each adapter maps
/// them onto its own schema. An absent slot means "no predicate", never a
/// null-equality predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Conditions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Conditions {
    pub fn is_empty(&self) -> bool {
        self.subject.is_none() && self.object.is_none() && self.role.is_none()
    }
}

/// Sort direction for relational queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Optional ordering clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

/// Immutable, request-scoped description of what to query.
///
/// Produced by an external parser and owned by the caller; the orchestrator
/// never mutates it after validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Intent {
    /// Which store this query targets.
    pub backend: Backend,

    /// What to do. Only `select` executes.
    pub operation: Operation,

    /// Generic condition slots; see [`Conditions`].
    #[serde(default)]
    pub conditions: Conditions,

    /// Optional projection. `None` means all fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,

    /// Optional table/collection/index override. Adapters fall back to their
    /// configured default resource when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Sort>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Intent {
    /// A bare select against a backend with no conditions.
    pub fn select(backend: Backend) -> Self {
        Self {
            backend,
            operation: Operation::Select,
            conditions: Conditions::default(),
            fields: None,
            resource: None,
            sort: None,
            limit: None,
        }
    }
}
