//! Document store adapter.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use fedquery_core::{AdapterError, Backend, BackendAdapter, Intent, Operation, Record};

use crate::driver::DocumentDriver;

const DEFAULT_COLLECTION: &str = "sessions";

/// Adapter for the document store.
///
/// Builds an equality filter from the condition slots (`subject` → `user_id`,
/// `object` → `type`) and passes documents through as-is, with `_id` coerced
/// to a string.
pub struct DocumentAdapter {
    driver: Arc<dyn DocumentDriver>,
}

impl DocumentAdapter {
    pub fn new(driver: Arc<dyn DocumentDriver>) -> Self {
        Self { driver }
    }

    fn build_filter(intent: &Intent) -> Value {
        let mut filter = Map::new();
        if let Some(subject) = &intent.conditions.subject {
            filter.insert("user_id".into(), Value::String(subject.clone()));
        }
        if let Some(object) = &intent.conditions.object {
            filter.insert("type".into(), Value::String(object.clone()));
        }
        Value::Object(filter)
    }

    fn normalize(documents: Vec<Value>) -> Vec<Record> {
        documents
            .into_iter()
            .filter_map(|doc| match doc {
                Value::Object(mut map) => {
                    if let Some(id) = map.remove("_id") {
                        map.insert("_id".into(), Value::String(stringify_id(&id)));
                    }
                    Some(map)
                }
                _ => None,
            })
            .collect()
    }
}

/// Render a document id as a plain string. Extended-JSON object ids arrive
/// as `{"$oid": "..."}`.
fn stringify_id(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        Value::Object(map) => match map.get("$oid").and_then(Value::as_str) {
            Some(oid) => oid.to_string(),
            None => Value::Object(map.clone()).to_string(),
        },
        other => other.to_string(),
    }
}

#[async_trait]
impl BackendAdapter for DocumentAdapter {
    fn backend(&self) -> Backend {
        Backend::Mongo
    }

    fn resource(&self, intent: &Intent) -> String {
        intent.resource.clone().unwrap_or_else(|| DEFAULT_COLLECTION.to_string())
    }

    async fn execute(&self, intent: &Intent) -> Result<Vec<Record>, AdapterError> {
        if intent.operation != Operation::Select {
            return Err(AdapterError::UnsupportedOperation(intent.operation));
        }

        let collection = self.resource(intent);
        let filter = Self::build_filter(intent);
        tracing::debug!(collection = %collection, filter = %filter, "built document filter");

        let documents = self
            .driver
            .find(&collection, &filter, intent.limit)
            .await
            .map_err(|e| AdapterError::Driver(e.to_string()))?;

        Ok(Self::normalize(documents))
    }
}
