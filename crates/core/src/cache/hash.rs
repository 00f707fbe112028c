//! Deterministic cache key derivation.

use sha2::{Digest, Sha256};

use crate::intent::{Intent, SortOrder};

/// Compute the cache key for a resolved intent.
///
/// The intent is rendered into a canonical JSON document (serde_json keeps
/// object keys sorted) and hashed with SHA-256. The condition slots are fixed
/// named fields, so two intents describing the same query always serialize
/// identically regardless of how they were constructed.
pub fn intent_cache_key(intent: &Intent) -> String {
    let canonical = serde_json::json!({
        "backend": intent.backend.as_str(),
        "operation": intent.operation.as_str(),
        "subject": intent.conditions.subject,
        "object": intent.conditions.object,
        "role": intent.conditions.role,
        "fields": intent.fields,
        "resource": intent.resource,
        "sort": intent.sort.as_ref().map(|s| {
            let order = match s.order {
                SortOrder::Asc => "asc",
                SortOrder::Desc => "desc",
            };
            format!("{}:{}", s.field, order)
        }),
        "limit": intent.limit,
    });

    let mut hasher = Sha256::new();
    hasher.update(canonical.to_string().as_bytes());
    hex::encode(hasher.finalize())
}
