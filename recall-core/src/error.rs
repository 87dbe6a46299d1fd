//! Error types for Recall operations

use crate::{NoteId, NoteTier, OwnerId};
use thiserror::Error;

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Note not found in {tier:?} tier: {id}")]
    NotFound { tier: NoteTier, id: NoteId },

    #[error("Insert failed in {tier:?} tier: {reason}")]
    InsertFailed { tier: NoteTier, reason: String },

    #[error("Update failed for {id} in {tier:?} tier: {reason}")]
    UpdateFailed {
        tier: NoteTier,
        id: NoteId,
        reason: String,
    },

    #[error("Backing store error: {reason}")]
    Backing { reason: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Cross-tier migration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MigrationError {
    /// The migration copied the note into the destination tier but could
    /// neither remove the source row nor undo the copy. The orphan id names
    /// the duplicate so callers can recover manually; nothing was lost.
    #[error(
        "Partial migration for owner {owner_id}: source {source_id} left a duplicate {orphan_id}: {reason}"
    )]
    PartialMigration {
        owner_id: OwnerId,
        source_id: NoteId,
        orphan_id: NoteId,
        reason: String,
    },
}

/// Cache layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache value serialization failed: {reason}")]
    Serialization { reason: String },

    #[error("Cache lock poisoned")]
    LockPoisoned,
}

/// Master error type for all Recall errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecallError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Result type alias for Recall operations.
pub type RecallResult<T> = Result<T, RecallError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_storage_error_display_not_found() {
        let err = StorageError::NotFound {
            tier: NoteTier::ShortTerm,
            id: Uuid::nil(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Note not found"));
        assert!(msg.contains("ShortTerm"));
        assert!(msg.contains("00000000-0000-0000-0000-000000000000"));
    }

    #[test]
    fn test_migration_error_display_partial() {
        let err = MigrationError::PartialMigration {
            owner_id: Uuid::nil(),
            source_id: Uuid::nil(),
            orphan_id: Uuid::nil(),
            reason: "delete raced".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Partial migration"));
        assert!(msg.contains("delete raced"));
    }

    #[test]
    fn test_cache_error_display_serialization() {
        let err = CacheError::Serialization {
            reason: "unexpected end of input".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("serialization failed"));
        assert!(msg.contains("unexpected end of input"));
    }

    #[test]
    fn test_recall_error_from_variants() {
        let storage = RecallError::from(StorageError::LockPoisoned);
        assert!(matches!(storage, RecallError::Storage(_)));

        let migration = RecallError::from(MigrationError::PartialMigration {
            owner_id: Uuid::nil(),
            source_id: Uuid::nil(),
            orphan_id: Uuid::nil(),
            reason: "x".to_string(),
        });
        assert!(matches!(migration, RecallError::Migration(_)));

        let cache = RecallError::from(CacheError::LockPoisoned);
        assert!(matches!(cache, RecallError::Cache(_)));
    }
}
