//! Event payloads for note mutations

use recall_core::{NoteId, NoteTier, OwnerId};
use serde::{Deserialize, Serialize};

/// A mutation that changed the note store.
///
/// Payloads carry enough identity for subscribers to invalidate or refresh
/// selectively instead of refetching everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteEvent {
    /// A note was created in the given tier.
    Created {
        owner_id: OwnerId,
        note_id: NoteId,
        tier: NoteTier,
    },
    /// A note was updated in place (same tier).
    Updated {
        owner_id: OwnerId,
        note_id: NoteId,
        tier: NoteTier,
    },
    /// A short-term note was soft-deleted.
    Archived { owner_id: OwnerId, note_id: NoteId },
    /// A note was physically removed from its tier.
    Deleted {
        owner_id: OwnerId,
        note_id: NoteId,
        tier: NoteTier,
    },
    /// A note was migrated across tiers. The destination row is a new
    /// record, so both ids are carried.
    Moved {
        owner_id: OwnerId,
        source_id: NoteId,
        dest_id: NoteId,
        from: NoteTier,
        to: NoteTier,
    },
}

impl NoteEvent {
    /// The owner whose views this event affects.
    pub fn owner_id(&self) -> OwnerId {
        match self {
            NoteEvent::Created { owner_id, .. }
            | NoteEvent::Updated { owner_id, .. }
            | NoteEvent::Archived { owner_id, .. }
            | NoteEvent::Deleted { owner_id, .. }
            | NoteEvent::Moved { owner_id, .. } => *owner_id,
        }
    }
}
