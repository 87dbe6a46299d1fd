//! Note entity and its tier model

use crate::{compute_content_hash, new_entity_id, ContentHash, NoteId, OwnerId, Timestamp};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Days a short-term note is retained before it counts as expired.
///
/// Advisory only: expiry is computed at read time and never enforced by a
/// background sweep. An expired note stays visible until an explicit delete
/// or a move removes it.
pub const RETENTION_DAYS: i64 = 30;

/// Storage tier a note belongs to.
///
/// The tier is a partition key, not a free-form attribute: it decides which
/// logical collection owns the row and which deletion semantics apply
/// (short-term archives, long-term deletes for good).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteTier {
    ShortTerm,
    LongTerm,
}

impl NoteTier {
    /// Stable lowercase name, used in log fields and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteTier::ShortTerm => "short_term",
            NoteTier::LongTerm => "long_term",
        }
    }
}

/// Entity kind discriminator for cache-key families.
///
/// Producers and invalidators must agree on these names without
/// coordination, so the mapping to strings is fixed here and nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Date-scoped daily-note queries.
    Notes,
    /// Short-term memory view queries.
    MemoryShort,
    /// Long-term memory view queries.
    MemoryLong,
    /// Project queries.
    Projects,
}

impl EntityKind {
    /// Stable lowercase name used as the leading cache-key segment.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Notes => "notes",
            EntityKind::MemoryShort => "memory_short",
            EntityKind::MemoryLong => "memory_long",
            EntityKind::Projects => "projects",
        }
    }
}

/// Note - a dated knowledge entry owned by a single user.
///
/// A note lives in exactly one tier at a time. Short-term notes age out
/// after [`RETENTION_DAYS`] and support soft deletion via `archived_at`;
/// long-term notes have no archival path and are deleted permanently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub note_id: NoteId,
    pub owner_id: OwnerId,
    pub title: String,
    pub content: String,
    pub content_hash: ContentHash,
    pub tags: BTreeSet<String>,
    pub tier: NoteTier,
    pub note_date: NaiveDate,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Soft-delete marker. Meaningful only for short-term notes: present
    /// means hidden from active list queries but still fetchable by id.
    pub archived_at: Option<Timestamp>,
    pub metadata: Option<serde_json::Value>,
}

impl Note {
    /// Build a fresh note from a draft, assigning id and timestamps.
    pub fn create(owner_id: OwnerId, tier: NoteTier, draft: NoteDraft) -> Self {
        let now = Utc::now();
        Self {
            note_id: new_entity_id(),
            owner_id,
            content_hash: compute_content_hash(draft.content.as_bytes()),
            title: draft.title,
            content: draft.content,
            tags: draft.tags,
            tier,
            note_date: draft.note_date,
            created_at: now,
            updated_at: now,
            archived_at: None,
            metadata: None,
        }
    }

    /// Whether this note has been soft-deleted.
    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    /// Days left before this short-term note counts as expired, clamped to
    /// zero. Returns `None` for long-term notes, which do not age out.
    pub fn days_remaining_at(&self, at: Timestamp) -> Option<i64> {
        match self.tier {
            NoteTier::ShortTerm => {
                let elapsed_days = (at - self.created_at).num_days();
                Some((RETENTION_DAYS - elapsed_days).max(0))
            }
            NoteTier::LongTerm => None,
        }
    }

    /// [`Note::days_remaining_at`] evaluated now.
    pub fn days_remaining(&self) -> Option<i64> {
        self.days_remaining_at(Utc::now())
    }
}

/// Input for creating a note. Id and timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tags: BTreeSet<String>,
    pub note_date: NaiveDate,
}

impl NoteDraft {
    /// Draft with the given title and content, dated today, no tags.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tags: BTreeSet::new(),
            note_date: Utc::now().date_naive(),
        }
    }

    /// Set the note date.
    pub fn with_date(mut self, note_date: NaiveDate) -> Self {
        self.note_date = note_date;
        self
    }

    /// Set the tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Update payload for notes. `None` fields are left untouched.
///
/// A `tier` that differs from the note's current tier is not an in-place
/// update: the store re-routes it to the migration path, because tier is a
/// partition key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteUpdate {
    /// New title
    pub title: Option<String>,
    /// New content (content hash is recomputed)
    pub content: Option<String>,
    /// Replacement tag set
    pub tags: Option<BTreeSet<String>>,
    /// New note date
    pub note_date: Option<NaiveDate>,
    /// Destination tier; differing from the current tier triggers a move
    pub tier: Option<NoteTier>,
    /// Replacement metadata
    pub metadata: Option<serde_json::Value>,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_short_term_note() -> Note {
        Note::create(
            new_entity_id(),
            NoteTier::ShortTerm,
            NoteDraft::new("Standup", "met with the design team"),
        )
    }

    #[test]
    fn test_create_assigns_identity_and_timestamps() {
        let owner = new_entity_id();
        let note = Note::create(owner, NoteTier::ShortTerm, NoteDraft::new("A", "B"));

        assert_eq!(note.owner_id, owner);
        assert_eq!(note.tier, NoteTier::ShortTerm);
        assert_eq!(note.created_at, note.updated_at);
        assert!(note.archived_at.is_none());
        assert_eq!(note.content_hash, compute_content_hash(b"B"));
    }

    #[test]
    fn test_days_remaining_today_is_full_retention() {
        let note = make_short_term_note();
        assert_eq!(note.days_remaining_at(note.created_at), Some(RETENTION_DAYS));
    }

    #[test]
    fn test_days_remaining_thirty_days_out_is_zero() {
        let note = make_short_term_note();
        let at = note.created_at + Duration::days(30);
        assert_eq!(note.days_remaining_at(at), Some(0));
    }

    #[test]
    fn test_days_remaining_clamps_past_expiry() {
        let note = make_short_term_note();
        let at = note.created_at + Duration::days(31);
        assert_eq!(note.days_remaining_at(at), Some(0));

        let far = note.created_at + Duration::days(400);
        assert_eq!(note.days_remaining_at(far), Some(0));
    }

    #[test]
    fn test_days_remaining_partial_day_does_not_count() {
        let note = make_short_term_note();
        let at = note.created_at + Duration::hours(29 * 24 + 23);
        assert_eq!(note.days_remaining_at(at), Some(1));
    }

    #[test]
    fn test_days_remaining_is_none_for_long_term() {
        let note = Note::create(
            new_entity_id(),
            NoteTier::LongTerm,
            NoteDraft::new("Reference", "keep forever"),
        );
        assert_eq!(note.days_remaining_at(Utc::now()), None);
    }

    #[test]
    fn test_draft_builder() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 24).unwrap();
        let draft = NoteDraft::new("Trip", "pack the charger")
            .with_date(date)
            .with_tags(["travel", "todo"]);

        assert_eq!(draft.note_date, date);
        assert!(draft.tags.contains("travel"));
        assert!(draft.tags.contains("todo"));
    }

    #[test]
    fn test_entity_kind_names_are_distinct() {
        let kinds = [
            EntityKind::Notes,
            EntityKind::MemoryShort,
            EntityKind::MemoryLong,
            EntityKind::Projects,
        ];
        for a in kinds {
            for b in kinds {
                if a != b {
                    assert_ne!(a.as_str(), b.as_str());
                }
            }
        }
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Property: days remaining is never negative and never exceeds the
        /// retention window, for any elapsed age.
        #[test]
        fn prop_days_remaining_is_clamped(age_hours in 0i64..24 * 365) {
            let note = Note::create(
                new_entity_id(),
                NoteTier::ShortTerm,
                NoteDraft::new("n", "c"),
            );
            let at = note.created_at + Duration::hours(age_hours);
            let remaining = note.days_remaining_at(at).expect("short-term note");

            prop_assert!(remaining >= 0);
            prop_assert!(remaining <= RETENTION_DAYS);
        }

        /// Property: remaining days decrease by exactly one per elapsed day
        /// until the clamp engages.
        #[test]
        fn prop_days_remaining_tracks_elapsed_days(days in 0i64..RETENTION_DAYS) {
            let note = Note::create(
                new_entity_id(),
                NoteTier::ShortTerm,
                NoteDraft::new("n", "c"),
            );
            let at = note.created_at + Duration::days(days);
            prop_assert_eq!(note.days_remaining_at(at), Some(RETENTION_DAYS - days));
        }
    }
}
