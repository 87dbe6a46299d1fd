//! The TTL cache store: get/set with lazy expiry, prefix invalidation,
//! clear, and introspection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use chrono::Utc;
use recall_core::CacheError;
use serde::{de::DeserializeOwned, Serialize};

use super::entry::{CacheConfig, CacheEntry, CacheTtl};
use super::keys::CacheKey;

/// Statistics about cache usage, for tests and invalidation-count checks.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of entries currently in the cache.
    pub size: usize,
    /// The current key set.
    pub keys: Vec<String>,
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses (including lazy expiries).
    pub misses: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Outcome of a key lookup before counters and purging are applied.
enum Lookup {
    Hit(serde_json::Value),
    Expired,
    Absent,
}

/// Generic TTL response cache.
///
/// Values are stored serialized, the way the durable cache backends store
/// them, so any serde-compatible query result can share one store.
///
/// # Concurrency
///
/// Designed for a single logical actor per request with no de-duplication of
/// concurrent miss-fills: two callers that miss the same key both fetch, and
/// the second `set` overwrites with an equivalent value. A miss-fill racing
/// an invalidation may re-populate a stale value after its fetch completes;
/// that is accepted because the TTL bounds staleness. Do not "fix" either
/// race with extra locking - it would change latency behavior, not
/// correctness.
pub struct TtlCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    default_ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl TtlCache {
    /// Create a cache with the default configuration (5-minute TTL).
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Create a cache with an explicit configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl: config.default_ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Get the cached value for a key, if present and not expired.
    ///
    /// Lazy expiry: an entry past its TTL is removed here and reported
    /// absent, exactly as if it had never been stored.
    pub fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Result<Option<T>, CacheError> {
        let mut entries = self.entries.write().map_err(|_| CacheError::LockPoisoned)?;

        let lookup = match entries.get(key.as_str()) {
            Some(entry) if entry.is_valid_at(Utc::now()) => Lookup::Hit(entry.value.clone()),
            Some(_) => Lookup::Expired,
            None => Lookup::Absent,
        };

        match lookup {
            Lookup::Hit(value) => {
                let value = serde_json::from_value(value).map_err(|e| {
                    CacheError::Serialization {
                        reason: e.to_string(),
                    }
                })?;
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(key = %key, "cache hit");
                Ok(Some(value))
            }
            Lookup::Expired => {
                entries.remove(key.as_str());
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(key = %key, "cache entry expired");
                Ok(None)
            }
            Lookup::Absent => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(key = %key, "cache miss");
                Ok(None)
            }
        }
    }

    /// Insert or overwrite an entry with the default TTL.
    pub fn set<T: Serialize>(&self, key: &CacheKey, value: &T) -> Result<(), CacheError> {
        self.set_with_duration(key, value, self.default_ttl)
    }

    /// Insert or overwrite an entry with a named TTL tier.
    pub fn set_with_ttl<T: Serialize>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: CacheTtl,
    ) -> Result<(), CacheError> {
        self.set_with_duration(key, value, ttl.as_duration())
    }

    /// Insert or overwrite an entry with an explicit TTL duration.
    pub fn set_with_duration<T: Serialize>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let value = serde_json::to_value(value).map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;

        let mut entries = self.entries.write().map_err(|_| CacheError::LockPoisoned)?;
        entries.insert(key.as_str().to_string(), CacheEntry::new(value, ttl));
        Ok(())
    }

    /// Delete every entry whose key starts with the prefix.
    ///
    /// Returns the number removed - for debug and test assertions, not for
    /// control flow.
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        let mut entries = match self.entries.write() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - entries.len();
        tracing::debug!(prefix, removed, "cache invalidation");
        removed
    }

    /// Drop all entries unconditionally. Idempotent.
    pub fn clear(&self) {
        let mut entries = match self.entries.write() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.clear();
    }

    /// Snapshot of cache size, keys, and hit/miss counters.
    pub fn stats(&self) -> CacheStats {
        let entries = match self.entries.read() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        CacheStats {
            size: entries.len(),
            keys: entries.keys().cloned().collect(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================
