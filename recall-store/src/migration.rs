//! Cross-tier migration.
//!
//! A move is delete-plus-insert against two logical collections that share
//! no transaction. The ordering here is insert-then-delete: if the source
//! delete fails after the destination copy exists, the recoverable failure
//! mode is a duplicate - never data loss. The source delete is also the
//! single point of truth for racing moves: exactly one concurrent delete of
//! the source row succeeds, and the loser compensates by removing its own
//! copy before surfacing `NotFound`.

use recall_core::{
    MigrationError, Note, NoteDraft, NoteId, NoteTier, OwnerId, RecallResult, StorageError,
};
use recall_events::NoteEvent;

use crate::service::NoteService;

impl NoteService {
    /// Move a short-term note into long-term storage.
    ///
    /// The destination row is a new record: title, content, tags, and
    /// `note_date` carry over; id and timestamps are freshly assigned.
    /// Returns the long-term note.
    pub async fn move_to_long_term(&self, owner: OwnerId, id: NoteId) -> RecallResult<Note> {
        self.migrate(owner, id, NoteTier::ShortTerm, NoteTier::LongTerm)
            .await
    }

    /// Move a long-term note back into short-term storage. The retention
    /// countdown restarts, since the destination assigns a fresh
    /// `created_at`.
    pub async fn move_to_short_term(&self, owner: OwnerId, id: NoteId) -> RecallResult<Note> {
        self.migrate(owner, id, NoteTier::LongTerm, NoteTier::ShortTerm)
            .await
    }

    /// Relocate a note between tiers.
    pub(crate) async fn migrate(
        &self,
        owner: OwnerId,
        id: NoteId,
        from: NoteTier,
        to: NoteTier,
    ) -> RecallResult<Note> {
        // An archived note is excluded from active reads; moving it would
        // let it reappear in the destination tier, so it counts as absent.
        let source = self
            .repo()
            .fetch(owner, id, from)
            .await?
            .filter(|note| !note.is_archived())
            .ok_or(StorageError::NotFound { tier: from, id })?;

        let draft = NoteDraft {
            title: source.title.clone(),
            content: source.content.clone(),
            tags: source.tags.clone(),
            note_date: source.note_date,
        };
        let copy = self.repo().insert(owner, to, draft).await?;

        // The source delete decides the race. Losing it means another move
        // (or delete) got there first; undo the copy and report NotFound.
        if let Err(delete_err) = self.repo().delete(owner, id, from).await {
            if let Err(rollback_err) = self.repo().delete(owner, copy.note_id, to).await {
                tracing::warn!(
                    owner_id = %owner,
                    source_id = %id,
                    orphan_id = %copy.note_id,
                    %rollback_err,
                    "migration rollback failed, duplicate left in destination tier"
                );
                return Err(MigrationError::PartialMigration {
                    owner_id: owner,
                    source_id: id,
                    orphan_id: copy.note_id,
                    reason: rollback_err.to_string(),
                }
                .into());
            }
            return Err(delete_err);
        }

        self.invalidate_tier(owner, from);
        self.invalidate_tier(owner, to);
        self.events().publish(&NoteEvent::Moved {
            owner_id: owner,
            source_id: id,
            dest_id: copy.note_id,
            from,
            to,
        });
        tracing::info!(
            owner_id = %owner,
            source_id = %id,
            dest_id = %copy.note_id,
            from = from.as_str(),
            to = to.as_str(),
            "note migrated"
        );

        Ok(copy)
    }
}

// =============================================================================
// TESTS
// =============================================================================
