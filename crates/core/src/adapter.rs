//! Backend adapter seam and the static adapter registry.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AdapterError;
use crate::intent::{Backend, Intent};
use crate::result::Record;

/// Translates an intent into a backend-native query, runs it, and normalizes
/// the rows.
///
/// Adapters must be safe for concurrent invocation; connection pooling and
/// timeouts belong to the driver layer behind them.
#[async_trait]
pub trait BackendAdapter: Send + Sync {
    /// The backend identifier this adapter serves.
    fn backend(&self) -> Backend;

    /// The table/collection/index the adapter will query for this intent.
    fn resource(&self, intent: &Intent) -> String;

    /// Build the native query, execute it, and return normalized records.
    async fn execute(&self, intent: &Intent) -> Result<Vec<Record>, AdapterError>;
}

/// Static mapping from backend identifier to adapter instance.
///
/// Built once at process start and read-only afterwards; lookup is O(1).
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: HashMap<Backend, Arc<dyn BackendAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter under its own backend identifier. Replaces any
    /// previous registration for the same backend.
    pub fn register(mut self, adapter: Arc<dyn BackendAdapter>) -> Self {
        self.adapters.insert(adapter.backend(), adapter);
        self
    }

    pub fn get(&self, backend: Backend) -> Option<&Arc<dyn BackendAdapter>> {
        self.adapters.get(&backend)
    }

    pub fn contains(&self, backend: Backend) -> bool {
        self.adapters.contains_key(&backend)
    }

    pub fn backends(&self) -> impl Iterator<Item = Backend> + '_ {
        self.adapters.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullAdapter(Backend);

    #[async_trait]
    impl BackendAdapter for NullAdapter {
        fn backend(&self) -> Backend {
            self.0
        }

        fn resource(&self, _intent: &Intent) -> String {
            "null".into()
        }

        async fn execute(&self, _intent: &Intent) -> Result<Vec<Record>, AdapterError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_registry_lookup() {
        let registry = AdapterRegistry::new()
            .register(Arc::new(NullAdapter(Backend::Postgres)))
            .register(Arc::new(NullAdapter(Backend::Mongo)));

        assert_eq!(registry.len(), 2);
        assert!(registry.contains(Backend::Postgres));
        assert!(registry.contains(Backend::Mongo));
        assert!(!registry.contains(Backend::Elasticsearch));
        assert_eq!(registry.get(Backend::Postgres).unwrap().backend(), Backend::Postgres);
    }

    #[test]
    fn test_registry_replaces_duplicate() {
        let registry = AdapterRegistry::new()
            .register(Arc::new(NullAdapter(Backend::Mysql)))
            .register(Arc::new(NullAdapter(Backend::Mysql)));
        assert_eq!(registry.len(), 1);
    }
}
