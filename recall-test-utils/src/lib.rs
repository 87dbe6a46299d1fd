//! Recall Test Utilities
//!
//! Centralized test infrastructure for the Recall workspace:
//! - Fixture builders for notes, drafts, and a fully wired service
//! - Proptest generators for entity inputs
//! - Re-exports of the in-memory repository and core types

// Re-export the fallback store from its source crate
pub use recall_store::{InMemoryNoteRepository, NoteRepository, NoteService, TtlCache};

// Re-export core types for convenience
pub use recall_core::{
    compute_content_hash, new_entity_id, ContentHash, EntityId, EntityKind, Note, NoteDraft,
    NoteId, NoteTier, NoteUpdate, OwnerId, RecallError, RecallResult, StorageError, Timestamp,
    RETENTION_DAYS,
};

pub use recall_events::{NoteEvent, NoteEventBus};

use std::sync::Arc;

// ============================================================================
// FIXTURES
// ============================================================================

/// A draft with distinguishable title/content and a tag, for tests that
/// assert carry-over across operations.
pub fn sample_draft(label: &str) -> NoteDraft {
    NoteDraft::new(
        format!("{} title", label),
        format!("{} content", label),
    )
    .with_tags([label])
}

/// A note built directly in the given tier, bypassing any repository.
pub fn sample_note(owner: OwnerId, tier: NoteTier, label: &str) -> Note {
    Note::create(owner, tier, sample_draft(label))
}

/// A service wired to a fresh in-memory repository, cache, and bus.
///
/// Returns the repository handle too, so tests can reach behind the
/// service's back (for example to assert what a cached read hides).
pub fn in_memory_service() -> (NoteService, Arc<InMemoryNoteRepository>) {
    let repo = Arc::new(InMemoryNoteRepository::new());
    let service = NoteService::new(
        Arc::clone(&repo) as Arc<dyn NoteRepository>,
        Arc::new(TtlCache::new()),
        Arc::new(NoteEventBus::new()),
    );
    (service, repo)
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

/// Proptest strategies for entity inputs.
pub mod strategies {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    /// Random owner/entity ids.
    pub fn entity_id() -> impl Strategy<Value = EntityId> {
        any::<[u8; 16]>().prop_map(uuid::Uuid::from_bytes)
    }

    /// Either tier.
    pub fn note_tier() -> impl Strategy<Value = NoteTier> {
        prop_oneof![Just(NoteTier::ShortTerm), Just(NoteTier::LongTerm)]
    }

    /// Dates within the application's plausible range.
    pub fn note_date() -> impl Strategy<Value = NaiveDate> {
        (2020i32..2030, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| {
            NaiveDate::from_ymd_opt(y, m, d).expect("day <= 28 is valid in every month")
        })
    }

    /// Printable titles and contents with tags.
    pub fn note_draft() -> impl Strategy<Value = NoteDraft> {
        (
            "[a-zA-Z0-9 ]{1,40}",
            "[a-zA-Z0-9 ]{0,200}",
            proptest::collection::btree_set("[a-z]{1,10}", 0..5),
            note_date(),
        )
            .prop_map(|(title, content, tags, date)| {
                let mut draft = NoteDraft::new(title, content).with_date(date);
                draft.tags = tags;
                draft
            })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sample_note_lands_in_requested_tier() {
        let owner = new_entity_id();
        let note = sample_note(owner, NoteTier::LongTerm, "fixture");
        assert_eq!(note.tier, NoteTier::LongTerm);
        assert_eq!(note.owner_id, owner);
        assert!(note.tags.contains("fixture"));
    }

    #[tokio::test]
    async fn test_in_memory_service_is_wired() {
        let (service, repo) = in_memory_service();
        let owner = new_entity_id();

        service
            .create(owner, NoteTier::ShortTerm, sample_draft("wired"))
            .await
            .expect("create through the service");

        assert_eq!(repo.count(NoteTier::ShortTerm).await, 1);
    }

    proptest! {
        #[test]
        fn prop_generated_drafts_are_well_formed(draft in strategies::note_draft()) {
            prop_assert!(!draft.title.is_empty());
            prop_assert!(draft.tags.len() <= 5);
        }
    }
}
