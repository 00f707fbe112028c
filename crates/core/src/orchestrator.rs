//! Query orchestration: parse, validate, cache-aside, dispatch.
//!
//! The [`Orchestrator`] is the control component of the federation layer. It
//! owns no I/O of its own: the parser, validator, cache store, and adapters
//! are all injected collaborators, and every `handle_query` call is an
//! independent unit of work with no shared mutable state between calls.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use crate::adapter::AdapterRegistry;
use crate::cache::{CacheStore, intent_cache_key};
use crate::error::Error;
use crate::intent::{Intent, Operation};
use crate::result::{CachedResult, NormalizedResult, QueryResponse};

/// External natural-language-to-intent parser boundary.
///
/// The orchestrator treats parser failures as opaque.
#[async_trait]
pub trait IntentParser: Send + Sync {
    async fn parse(&self, text: &str) -> Result<Intent, Box<dyn std::error::Error + Send + Sync>>;
}

/// Optional validation hook run on the parsed intent.
///
/// Returns violation messages; an empty list means the intent is valid.
pub trait IntentValidator: Send + Sync {
    fn validate(&self, intent: &Intent) -> Vec<String>;
}

/// Federated query orchestrator.
///
/// Receives raw query text, derives a deterministic cache key from the parsed
/// intent, consults the cache, dispatches to the right adapter on a miss, and
/// writes the result back best-effort.
pub struct Orchestrator {
    parser: Arc<dyn IntentParser>,
    validator: Option<Arc<dyn IntentValidator>>,
    cache: Arc<dyn CacheStore>,
    registry: AdapterRegistry,
    cache_ttl_seconds: i64,
}

impl Orchestrator {
    pub fn new(parser: Arc<dyn IntentParser>, cache: Arc<dyn CacheStore>, registry: AdapterRegistry) -> Self {
        Self { parser, validator: None, cache, registry, cache_ttl_seconds: 3600 }
    }

    pub fn with_validator(mut self, validator: Arc<dyn IntentValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn with_cache_ttl(mut self, seconds: i64) -> Self {
        self.cache_ttl_seconds = seconds;
        self
    }

    /// Resolve one query end to end.
    ///
    /// Never returns an error: every terminal failure folds into the response
    /// as a single human-readable message.
    pub async fn handle_query(&self, text: &str) -> QueryResponse {
        match self.resolve(text).await {
            Ok(result) => QueryResponse::ok(result),
            Err(err) => {
                tracing::debug!(error = %err, "query failed");
                QueryResponse::failure(err.to_string())
            }
        }
    }

    async fn resolve(&self, text: &str) -> Result<NormalizedResult, Error> {
        let started = Instant::now();

        if text.trim().is_empty() {
            return Err(Error::EmptyQuery);
        }

        let intent = self
            .parser
            .parse(text)
            .await
            .map_err(|e| Error::Parse(e.to_string()))?;
        tracing::debug!(backend = %intent.backend, operation = %intent.operation, "parsed intent");

        self.check_intent(&intent)?;

        // Fail fast on unknown backends before any cache or adapter traffic.
        let adapter = self
            .registry
            .get(intent.backend)
            .ok_or_else(|| Error::UnsupportedBackend(intent.backend.as_str().to_string()))?;

        let key = intent_cache_key(&intent);

        if let Some(cached) = self.cache_lookup(&key).await {
            tracing::debug!(backend = %intent.backend, key = %key, "cache hit");
            return Ok(NormalizedResult::new(
                &cached.backend,
                &cached.resource,
                cached.rows,
                true,
                elapsed_ms(started),
            ));
        }

        tracing::info!(backend = %intent.backend, "dispatching query");
        let rows = adapter.execute(&intent).await.map_err(|e| Error::BackendExecution {
            backend: intent.backend.as_str().to_string(),
            cause: e.to_string(),
        })?;
        let resource = adapter.resource(&intent);

        self.cache_write(&key, &intent, &resource, &rows).await;

        Ok(NormalizedResult::new(intent.backend.as_str(), &resource, rows, false, elapsed_ms(started)))
    }

    /// Built-in select-only guard plus the optional validator hook. All
    /// violations are collected before failing; the query is never
    /// half-applied on partial validation.
    fn check_intent(&self, intent: &Intent) -> Result<(), Error> {
        let mut violations = Vec::new();

        if intent.operation != Operation::Select {
            violations.push(format!("operation '{}' is not supported; only select queries are allowed", intent.operation));
        }

        if let Some(validator) = &self.validator {
            violations.extend(validator.validate(intent));
        }

        if violations.is_empty() { Ok(()) } else { Err(Error::ValidationFailed(violations.join("; "))) }
    }

    /// Cache get with silent degradation: any failure, including an
    /// undecodable payload, is treated as a miss.
    async fn cache_lookup(&self, key: &str) -> Option<CachedResult> {
        match self.cache.get(key).await {
            Ok(Some(payload)) => match serde_json::from_str::<CachedResult>(&payload) {
                Ok(cached) => Some(cached),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "discarding undecodable cache entry");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cache get failed; treating as miss");
                None
            }
        }
    }

    /// Best-effort cache write. A failure here is logged and never fails the
    /// query; a late-arriving write for an abandoned call is harmless since
    /// intents are idempotent reads.
    async fn cache_write(&self, key: &str, intent: &Intent, resource: &str, rows: &[crate::result::Record]) {
        let cached = CachedResult {
            backend: intent.backend.as_str().to_string(),
            resource: resource.to_string(),
            rows: rows.to_vec(),
        };

        match serde_json::to_string(&cached) {
            Ok(payload) => {
                if let Err(e) = self.cache.put(key, &payload, self.cache_ttl_seconds).await {
                    tracing::warn!(key = %key, error = %e, "failed to cache query result");
                }
            }
            Err(e) => tracing::warn!(key = %key, error = %e, "failed to serialize result for cache"),
        }
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::BackendAdapter;
    use crate::error::{AdapterError, CacheError};
    use crate::intent::{Backend, Conditions};
    use crate::result::Record;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubParser {
        calls: AtomicUsize,
        outcome: Result<Intent, String>,
    }

    impl StubParser {
        fn ok(intent: Intent) -> Self {
            Self { calls: AtomicUsize::new(0), outcome: Ok(intent) }
        }

        fn failing(message: &str) -> Self {
            Self { calls: AtomicUsize::new(0), outcome: Err(message.to_string()) }
        }
    }

    #[async_trait]
    impl IntentParser for StubParser {
        async fn parse(&self, _text: &str) -> Result<Intent, Box<dyn std::error::Error + Send + Sync>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone().map_err(Into::into)
        }
    }

    struct CountingAdapter {
        backend: Backend,
        resource: String,
        calls: AtomicUsize,
        rows: Vec<Record>,
        fail: bool,
    }

    impl CountingAdapter {
        fn new(backend: Backend, resource: &str, rows: Vec<Record>) -> Self {
            Self { backend, resource: resource.to_string(), calls: AtomicUsize::new(0), rows, fail: false }
        }
    }

    #[async_trait]
    impl BackendAdapter for CountingAdapter {
        fn backend(&self) -> Backend {
            self.backend
        }

        fn resource(&self, _intent: &Intent) -> String {
            self.resource.clone()
        }

        async fn execute(&self, _intent: &Intent) -> Result<Vec<Record>, AdapterError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AdapterError::Driver("connection refused".into()));
            }
            Ok(self.rows.clone())
        }
    }

    #[derive(Default)]
    struct MemoryCache {
        entries: Mutex<HashMap<String, String>>,
        gets: AtomicUsize,
        puts: AtomicUsize,
        fail_gets: bool,
        fail_puts: bool,
    }

    #[async_trait]
    impl CacheStore for MemoryCache {
        async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            if self.fail_gets {
                return Err(CacheError::Corrupt("simulated get failure".into()));
            }
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn put(&self, key: &str, value: &str, _ttl_seconds: i64) -> Result<(), CacheError> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            if self.fail_puts {
                return Err(CacheError::Corrupt("simulated put failure".into()));
            }
            self.entries.lock().unwrap().insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    fn user_row(name: &str) -> Record {
        let mut record = Record::new();
        record.insert("username".into(), serde_json::Value::String(name.into()));
        record.insert("role".into(), serde_json::Value::String("admin".into()));
        record
    }

    fn alice_intent() -> Intent {
        let mut intent = Intent::select(Backend::Postgres);
        intent.conditions = Conditions { subject: Some("alice".into()), ..Default::default() };
        intent
    }

    struct Fixture {
        parser: Arc<StubParser>,
        adapter: Arc<CountingAdapter>,
        cache: Arc<MemoryCache>,
        orchestrator: Orchestrator,
    }

    fn fixture(parser: StubParser, adapter: CountingAdapter, cache: MemoryCache) -> Fixture {
        let parser = Arc::new(parser);
        let adapter = Arc::new(adapter);
        let cache = Arc::new(cache);
        let registry = AdapterRegistry::new().register(adapter.clone());
        let orchestrator = Orchestrator::new(parser.clone(), cache.clone(), registry);
        Fixture { parser, adapter, cache, orchestrator }
    }

    #[tokio::test]
    async fn test_empty_input_short_circuits() {
        let fx = fixture(
            StubParser::ok(alice_intent()),
            CountingAdapter::new(Backend::Postgres, "users", vec![]),
            MemoryCache::default(),
        );

        for text in ["", "   ", "\n\t"] {
            let response = fx.orchestrator.handle_query(text).await;
            assert!(!response.success);
            assert!(response.results.is_empty());
            assert!(response.error.as_deref().unwrap().contains("No query provided"));
        }

        assert_eq!(fx.parser.calls.load(Ordering::SeqCst), 0);
        assert_eq!(fx.adapter.calls.load(Ordering::SeqCst), 0);
        assert_eq!(fx.cache.gets.load(Ordering::SeqCst), 0);
        assert_eq!(fx.cache.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_parse_failure() {
        let fx = fixture(
            StubParser::failing("unintelligible input"),
            CountingAdapter::new(Backend::Postgres, "users", vec![]),
            MemoryCache::default(),
        );

        let response = fx.orchestrator.handle_query("gibberish").await;
        assert!(!response.success);
        let error = response.error.unwrap();
        assert!(error.contains("PARSE_ERROR"));
        assert!(error.contains("unintelligible input"));
        assert_eq!(fx.adapter.calls.load(Ordering::SeqCst), 0);
    }

    struct RejectAll;

    impl IntentValidator for RejectAll {
        fn validate(&self, _intent: &Intent) -> Vec<String> {
            vec!["Invalid table name".into(), "Missing required field".into()]
        }
    }

    #[tokio::test]
    async fn test_validation_short_circuit_joins_violations() {
        let fx = fixture(
            StubParser::ok(alice_intent()),
            CountingAdapter::new(Backend::Postgres, "users", vec![user_row("alice")]),
            MemoryCache::default(),
        );
        let orchestrator = fx.orchestrator.with_validator(Arc::new(RejectAll));

        let response = orchestrator.handle_query("find alice").await;
        assert!(!response.success);
        let error = response.error.unwrap();
        assert!(error.contains("Invalid table name"));
        assert!(error.contains("Missing required field"));
        assert_eq!(fx.adapter.calls.load(Ordering::SeqCst), 0);
        assert_eq!(fx.cache.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_non_select_rejected() {
        let mut intent = alice_intent();
        intent.operation = Operation::Insert;
        let fx = fixture(
            StubParser::ok(intent),
            CountingAdapter::new(Backend::Postgres, "users", vec![]),
            MemoryCache::default(),
        );

        let response = fx.orchestrator.handle_query("add a user").await;
        assert!(!response.success);
        assert!(response.error.unwrap().contains("insert"));
        assert_eq!(fx.adapter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unsupported_backend_isolated() {
        // Registry only knows postgres; the intent targets mongo.
        let fx = fixture(
            StubParser::ok(Intent::select(Backend::Mongo)),
            CountingAdapter::new(Backend::Postgres, "users", vec![]),
            MemoryCache::default(),
        );

        let response = fx.orchestrator.handle_query("show sessions").await;
        assert!(!response.success);
        let error = response.error.unwrap();
        assert!(error.contains("UNSUPPORTED_BACKEND"));
        assert!(error.contains("mongo"));
        assert_eq!(fx.adapter.calls.load(Ordering::SeqCst), 0);
        assert_eq!(fx.cache.gets.load(Ordering::SeqCst), 0);
        assert_eq!(fx.cache.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cache_aside_cold_then_warm() {
        let rows = vec![user_row("alice"), user_row("alicia")];
        let fx = fixture(
            StubParser::ok(alice_intent()),
            CountingAdapter::new(Backend::Postgres, "users", rows.clone()),
            MemoryCache::default(),
        );

        let cold = fx.orchestrator.handle_query("find alice in users").await;
        assert!(cold.success);
        let result = &cold.results[0];
        assert_eq!(result.backend, "postgres");
        assert_eq!(result.resource, "users");
        assert_eq!(result.count, 2);
        assert_eq!(result.rows, rows);
        assert!(!result.from_cache);
        assert_eq!(fx.adapter.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fx.cache.puts.load(Ordering::SeqCst), 1);

        let warm = fx.orchestrator.handle_query("find alice in users").await;
        assert!(warm.success);
        let replay = &warm.results[0];
        assert!(replay.from_cache);
        assert_eq!(replay.rows, rows);
        assert_eq!(replay.count, replay.rows.len());
        // No additional backend work or cache write.
        assert_eq!(fx.adapter.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fx.cache.puts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_backend_failure_wrapped() {
        let mut adapter = CountingAdapter::new(Backend::Postgres, "users", vec![]);
        adapter.fail = true;
        let fx = fixture(StubParser::ok(alice_intent()), adapter, MemoryCache::default());

        let response = fx.orchestrator.handle_query("find alice").await;
        assert!(!response.success);
        let error = response.error.unwrap();
        assert!(error.contains("BACKEND_EXECUTION"));
        assert!(error.contains("postgres"));
        assert!(error.contains("connection refused"));
        // Nothing written on failure.
        assert_eq!(fx.cache.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cache_put_failure_is_best_effort() {
        let mut cache = MemoryCache::default();
        cache.fail_puts = true;
        let fx = fixture(
            StubParser::ok(alice_intent()),
            CountingAdapter::new(Backend::Postgres, "users", vec![user_row("alice")]),
            cache,
        );

        let response = fx.orchestrator.handle_query("find alice").await;
        assert!(response.success);
        assert_eq!(response.results[0].count, 1);
    }

    #[tokio::test]
    async fn test_cache_get_failure_treated_as_miss() {
        let mut cache = MemoryCache::default();
        cache.fail_gets = true;
        let fx = fixture(
            StubParser::ok(alice_intent()),
            CountingAdapter::new(Backend::Postgres, "users", vec![user_row("alice")]),
            cache,
        );

        let response = fx.orchestrator.handle_query("find alice").await;
        assert!(response.success);
        assert!(!response.results[0].from_cache);
        assert_eq!(fx.adapter.calls.load(Ordering::SeqCst), 1);
    }
}
