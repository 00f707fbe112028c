//! SQLite-backed query result cache.
//!
//! Cache-aside storage for normalized query results, keyed by a SHA-256
//! digest of the resolved intent. It supports:
//!
//! - Deterministic key derivation from intents
//! - TTL expiry checked on read (passive), plus an explicit maintenance purge
//! - Automatic schema migrations
//! - WAL mode for concurrent access

pub mod connection;
pub mod hash;
pub mod migrations;
pub mod store;

pub use connection::CacheDb;
pub use hash::intent_cache_key;
pub use store::CacheStore;
