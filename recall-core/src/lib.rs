//! Recall Core - Entity Types
//!
//! Pure data structures with no behavior beyond derived, read-time
//! computations. All other crates depend on this. This crate contains ONLY
//! data types - no storage, no caching, no I/O.

mod error;
mod identity;
mod note;

pub use error::{
    CacheError, MigrationError, RecallError, RecallResult, StorageError,
};
pub use identity::{
    compute_content_hash, new_entity_id, ContentHash, EntityId, NoteId, OwnerId, Timestamp,
};
pub use note::{
    EntityKind, Note, NoteDraft, NoteTier, NoteUpdate, RETENTION_DAYS,
};
