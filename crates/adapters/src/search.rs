//! Full-text search adapter.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use fedquery_core::{AdapterError, Backend, BackendAdapter, Intent, Operation, Record};

use crate::driver::SearchDriver;

const DEFAULT_INDEX: &str = "documents";

/// Adapter for the full-text search store.
///
/// Builds a boolean `must` query from the condition slots (`subject` →
/// `match` on `author`, `object` → `match` on `content`); no conditions means
/// match-all. Each hit's source document is unwrapped.
pub struct SearchAdapter {
    driver: Arc<dyn SearchDriver>,
}

impl SearchAdapter {
    pub fn new(driver: Arc<dyn SearchDriver>) -> Self {
        Self { driver }
    }

    fn build_query(intent: &Intent) -> Value {
        let mut must = Vec::new();
        if let Some(subject) = &intent.conditions.subject {
            must.push(json!({"match": {"author": subject}}));
        }
        if let Some(object) = &intent.conditions.object {
            must.push(json!({"match": {"content": object}}));
        }
        if must.is_empty() {
            must.push(json!({"match_all": {}}));
        }

        let mut body = json!({"query": {"bool": {"must": must}}});
        if let Some(limit) = intent.limit {
            body["size"] = json!(limit);
        }
        body
    }

    fn normalize(hits: Vec<Value>) -> Vec<Record> {
        hits.into_iter()
            .filter_map(|hit| match hit {
                Value::Object(mut map) => match map.remove("_source") {
                    Some(Value::Object(source)) => Some(source),
                    // Drivers that pre-unwrap hand the document directly.
                    None => Some(map),
                    Some(_) => None,
                },
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl BackendAdapter for SearchAdapter {
    fn backend(&self) -> Backend {
        Backend::Elasticsearch
    }

    fn resource(&self, intent: &Intent) -> String {
        intent.resource.clone().unwrap_or_else(|| DEFAULT_INDEX.to_string())
    }

    async fn execute(&self, intent: &Intent) -> Result<Vec<Record>, AdapterError> {
        if intent.operation != Operation::Select {
            return Err(AdapterError::UnsupportedOperation(intent.operation));
        }

        let index = self.resource(intent);
        let body = Self::build_query(intent);
        tracing::debug!(index = %index, "built search query");

        let hits = self
            .driver
            .search(&index, &body)
            .await
            .map_err(|e| AdapterError::Driver(e.to_string()))?;

        Ok(Self::normalize(hits))
    }
}
