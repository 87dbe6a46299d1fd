//! Response cache with explicit TTL contracts and prefix invalidation.
//!
//! # Design Philosophy
//!
//! The cache holds a bounded number of per-user query results, so it carries
//! no eviction policy beyond TTL expiry - no LRU, no capacity bound. That is
//! a deliberate correctness simplification, not an oversight.
//!
//! Expiry is lazy: an entry past its TTL is treated as absent and purged on
//! the read that finds it. There is no background sweep timer; adding one
//! would change the memory and latency profile without improving
//! correctness.
//!
//! # Key Discipline
//!
//! Keys can only be built through [`CacheKey`], which derives them from
//! (entity kind, owner id, optional qualifier). Producers and invalidators
//! therefore agree on naming without coordination, and invalidation by
//! [`invalidation_prefix`] reaches every date-qualified variant of a query
//! without ever aliasing across owners or kinds.

pub mod entry;
pub mod keys;
pub mod store;

pub use entry::{CacheConfig, CacheEntry, CacheTtl};
pub use keys::{invalidation_prefix, CacheKey};
pub use store::{CacheStats, TtlCache};
