//! In-memory TTL cache with FIFO eviction.
//!
//! # Design
//! Entries live in an `IndexMap` so insertion order is tracked for free:
//! when the cache is full the entry at index 0 is the oldest insertion.
//! Overwriting a key keeps its original position. Expiry is checked lazily
//! on `get`, which also drops the stale entry.
//!
//! Time comes from `tokio::time::Instant` so tests running on a paused
//! runtime can move the clock with `tokio::time::advance`.

use std::time::Duration;

use indexmap::IndexMap;
use tokio::time::Instant;

use crate::config::CacheConfig;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
    expires_at: Instant,
}

/// Bounded key/value store whose entries expire after a TTL.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: IndexMap<String, CacheEntry<V>>,
    config: CacheConfig,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: IndexMap::new(),
            config,
        }
    }

    /// Returns the value if it has not expired. A stale entry is removed.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = Instant::now();
        let entry = self.entries.get(key)?;
        if now > entry.expires_at {
            self.entries.shift_remove(key);
            tracing::trace!(key, "cache entry expired");
            return None;
        }
        tracing::trace!(key, age_ms = (now - entry.stored_at).as_millis() as u64, "cache hit");
        Some(entry.value.clone())
    }

    /// Store `value` with the configured default TTL.
    pub fn put(&mut self, key: impl Into<String>, value: V) {
        self.put_with_ttl(key, value, self.config.default_ttl);
    }

    /// Store `value` until `now + ttl`. A new key arriving at a full cache
    /// evicts the oldest insertion first.
    pub fn put_with_ttl(&mut self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        if self.config.max_size == 0 {
            return;
        }
        if !self.entries.contains_key(&key) && self.entries.len() >= self.config.max_size {
            self.entries.shift_remove_index(0);
        }
        let now = Instant::now();
        self.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: now,
                expires_at: now + ttl,
            },
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries, including ones that expired but have not
    /// been read since.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn config(&self) -> CacheConfig {
        self.config
    }
}

/// Deterministic cache key for an endpoint and its query parameters.
/// Parameters are sorted so their order does not matter.
pub fn cache_key(endpoint: &str, params: &[(String, String)]) -> String {
    if params.is_empty() {
        return endpoint.to_string();
    }
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort();
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(sorted.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish();
    format!("{endpoint}?{query}")
}
