//! Cache entries and the named TTL tiers callers choose from

use chrono::Utc;
use recall_core::Timestamp;
use std::time::Duration;

/// Named time-to-live tiers for cached query results.
///
/// Callers pick a tier instead of inventing ad-hoc durations, so staleness
/// tolerance stays legible at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CacheTtl {
    /// 2 minutes - rapidly changing lists.
    Short,
    /// 5 minutes - the default for per-user query results.
    #[default]
    Medium,
    /// 15 minutes - slow-moving aggregates.
    Long,
    /// 60 minutes - near-static reference data.
    VeryLong,
}

impl CacheTtl {
    /// The concrete duration for this tier.
    pub fn as_duration(&self) -> Duration {
        match self {
            CacheTtl::Short => Duration::from_secs(2 * 60),
            CacheTtl::Medium => Duration::from_secs(5 * 60),
            CacheTtl::Long => Duration::from_secs(15 * 60),
            CacheTtl::VeryLong => Duration::from_secs(60 * 60),
        }
    }
}

/// A cached value with its storage timestamp and time-to-live.
///
/// Valid iff `now - stored_at <= ttl`; an expired entry must be treated as
/// absent and is purged by the read that discovers it.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: serde_json::Value,
    pub stored_at: Timestamp,
    pub ttl: Duration,
}

impl CacheEntry {
    /// Create an entry stamped with the current time.
    pub fn new(value: serde_json::Value, ttl: Duration) -> Self {
        Self {
            value,
            stored_at: Utc::now(),
            ttl,
        }
    }

    /// Whether the entry is still valid at the given instant.
    pub fn is_valid_at(&self, at: Timestamp) -> bool {
        let age = at
            .signed_duration_since(self.stored_at)
            .to_std()
            .unwrap_or(Duration::ZERO);
        age <= self.ttl
    }
}

/// Configuration for the TTL cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL applied when a caller does not pick a tier explicitly.
    pub default_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: CacheTtl::Medium.as_duration(),
        }
    }
}

impl CacheConfig {
    /// Create a new cache config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default TTL from a named tier.
    pub fn with_default_ttl(mut self, ttl: CacheTtl) -> Self {
        self.default_ttl = ttl.as_duration();
        self
    }

    /// Set the default TTL from an explicit duration.
    pub fn with_default_duration(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    #[test]
    fn test_ttl_tiers_are_ordered() {
        assert!(CacheTtl::Short.as_duration() < CacheTtl::Medium.as_duration());
        assert!(CacheTtl::Medium.as_duration() < CacheTtl::Long.as_duration());
        assert!(CacheTtl::Long.as_duration() < CacheTtl::VeryLong.as_duration());
    }

    #[test]
    fn test_default_tier_is_five_minutes() {
        assert_eq!(CacheTtl::default().as_duration(), Duration::from_secs(300));
        assert_eq!(CacheConfig::default().default_ttl, Duration::from_secs(300));
    }

    #[test]
    fn test_entry_valid_within_ttl() {
        let entry = CacheEntry::new(serde_json::json!([1, 2, 3]), Duration::from_secs(60));
        assert!(entry.is_valid_at(entry.stored_at));
        assert!(entry.is_valid_at(entry.stored_at + ChronoDuration::seconds(60)));
    }

    #[test]
    fn test_entry_expired_past_ttl() {
        let entry = CacheEntry::new(serde_json::json!("v"), Duration::from_secs(60));
        assert!(!entry.is_valid_at(entry.stored_at + ChronoDuration::seconds(61)));
    }

    #[test]
    fn test_entry_tolerates_clock_skew() {
        // A read timestamp before stored_at counts as zero age, not negative.
        let entry = CacheEntry::new(serde_json::json!("v"), Duration::from_secs(1));
        assert!(entry.is_valid_at(entry.stored_at - ChronoDuration::seconds(30)));
    }

    #[test]
    fn test_config_builder() {
        let config = CacheConfig::new().with_default_ttl(CacheTtl::VeryLong);
        assert_eq!(config.default_ttl, Duration::from_secs(3600));

        let config = CacheConfig::new().with_default_duration(Duration::from_millis(250));
        assert_eq!(config.default_ttl, Duration::from_millis(250));
    }
}
