//! Recall Store - Tiered Note Storage and Response Cache
//!
//! The systems core of the note subsystem: a TTL response cache with
//! prefix-based invalidation, the two-tier note repository abstraction with
//! its in-memory fallback implementation, and the cached service facade that
//! coordinates reads, mutations, invalidation, event publication, and
//! cross-tier migration.

pub mod cache;
mod migration;
mod repository;
mod service;

pub use cache::{
    invalidation_prefix, CacheConfig, CacheEntry, CacheKey, CacheStats, CacheTtl, TtlCache,
};
pub use repository::{InMemoryNoteRepository, NoteRepository};
pub use service::NoteService;
