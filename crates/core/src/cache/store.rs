//! Cache store boundary and the SQLite-backed implementation.
//!
//! The orchestrator only ever calls `get` and `put`; expiry is passive. An
//! entry past its TTL is invisible to `get` and reclaimed by the maintenance
//! purge, never by the query path.

use super::connection::CacheDb;
use crate::error::CacheError;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio_rusqlite::params;

/// Key/value cache with TTL, as seen by the orchestrator.
///
/// Both operations may fail transiently; callers treat a get-failure as a
/// miss and a put-failure as best-effort.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch an unexpired entry. `None` means miss.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store an entry under `key` for `ttl_seconds`.
    async fn put(&self, key: &str, value: &str, ttl_seconds: i64) -> Result<(), CacheError>;
}

impl CacheDb {
    /// Get a cached payload by key hash.
    ///
    /// Returns None if the key doesn't exist or the entry has expired.
    pub async fn get_entry(&self, key_hash: &str) -> Result<Option<String>, CacheError> {
        let key_hash = key_hash.to_string();
        let now = Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<Option<String>, CacheError> {
                let mut stmt = conn
                    .prepare("SELECT payload_json FROM query_cache WHERE key_hash = ?1 AND expires_at > ?2")?;

                let result = stmt.query_row(params![key_hash, now], |row| row.get(0));

                match result {
                    Ok(json) => Ok(Some(json)),
                    Err(tokio_rusqlite::rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(CacheError::from)
    }

    /// Insert or update a cached payload.
    ///
    /// Uses UPSERT semantics: inserts if the key doesn't exist, refreshes the
    /// payload and expiry if it does.
    pub async fn put_entry(&self, key_hash: &str, payload_json: &str, ttl_seconds: i64) -> Result<(), CacheError> {
        let key_hash = key_hash.to_string();
        let payload_json = payload_json.to_string();

        let fetched_at = Utc::now().to_rfc3339();
        let expires_at = (Utc::now() + Duration::seconds(ttl_seconds)).to_rfc3339();

        self.conn
            .call(move |conn| -> Result<(), CacheError> {
                conn.execute(
                    "INSERT INTO query_cache (key_hash, payload_json, fetched_at, expires_at)
                    VALUES (?1, ?2, ?3, ?4)
                    ON CONFLICT(key_hash) DO UPDATE SET
                        payload_json = excluded.payload_json,
                        fetched_at = excluded.fetched_at,
                        expires_at = excluded.expires_at",
                    params![key_hash, payload_json, fetched_at, expires_at],
                )?;
                Ok(())
            })
            .await
            .map_err(CacheError::from)
    }

    /// Delete expired cache entries.
    ///
    /// Returns the number of deleted entries. This is a maintenance
    /// operation; the query path relies on passive expiry alone.
    pub async fn purge_expired(&self) -> Result<u64, CacheError> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<u64, CacheError> {
                let count = conn.execute("DELETE FROM query_cache WHERE expires_at < ?1", params![now])?;
                Ok(count as u64)
            })
            .await
            .map_err(CacheError::from)
    }
}

#[async_trait]
impl CacheStore for CacheDb {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.get_entry(key).await
    }

    async fn put(&self, key: &str, value: &str, ttl_seconds: i64) -> Result<(), CacheError> {
        self.put_entry(key, value, ttl_seconds).await
    }
}
