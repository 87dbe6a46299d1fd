//! Note repository abstraction and the in-memory fallback implementation.
//!
//! The trait is the contract the durable backend must satisfy: per tier, a
//! row-oriented store with atomic individual insert/delete. Which
//! implementation backs a [`crate::NoteService`] is decided once at
//! construction - never re-checked per call.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use recall_core::{
    compute_content_hash, Note, NoteDraft, NoteId, NoteTier, NoteUpdate, OwnerId, RecallResult,
    StorageError,
};
use tokio::sync::RwLock;

/// Storage contract for the two-tier note store.
///
/// Insert and delete must each be individually atomic; nothing is required
/// across tiers (the migration path compensates instead, see
/// [`crate::NoteService::move_to_long_term`]). `delete` in particular is the
/// single point of truth for racing migrations: exactly one concurrent
/// delete of a row may succeed.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a new note into the tier's collection, assigning id and
    /// timestamps. Returns the stored row.
    async fn insert(&self, owner: OwnerId, tier: NoteTier, draft: NoteDraft) -> RecallResult<Note>;

    /// Fetch a note by id, archived or not. `None` if absent from the tier
    /// or owned by someone else.
    async fn fetch(&self, owner: OwnerId, id: NoteId, tier: NoteTier)
        -> RecallResult<Option<Note>>;

    /// Apply an in-place field update and bump `updated_at`. A `tier` in the
    /// update that differs from the row's tier is rejected: tier is a
    /// partition key and tier changes go through migration.
    async fn update(
        &self,
        owner: OwnerId,
        id: NoteId,
        tier: NoteTier,
        update: NoteUpdate,
    ) -> RecallResult<Note>;

    /// Physically remove a note from the tier. Returns the removed row;
    /// `NotFound` if it was already gone.
    async fn delete(&self, owner: OwnerId, id: NoteId, tier: NoteTier) -> RecallResult<Note>;

    /// Soft-delete a short-term note by stamping `archived_at`.
    async fn archive(&self, owner: OwnerId, id: NoteId) -> RecallResult<Note>;

    /// List an owner's notes in a tier, optionally restricted to a single
    /// `note_date`. Archived short-term notes are excluded. Sorted by
    /// creation time.
    async fn list(
        &self,
        owner: OwnerId,
        tier: NoteTier,
        date: Option<NaiveDate>,
    ) -> RecallResult<Vec<Note>>;
}

// ============================================================================
// IN-MEMORY FALLBACK STORE
// ============================================================================

/// In-memory note repository: the fallback store used when no durable
/// backend is configured, and the workhorse for tests.
///
/// One collection per tier, each behind its own lock, mirroring the
/// two-table layout of the durable backend.
#[derive(Debug, Default)]
pub struct InMemoryNoteRepository {
    short_term: Arc<RwLock<HashMap<NoteId, Note>>>,
    long_term: Arc<RwLock<HashMap<NoteId, Note>>>,
}

impl InMemoryNoteRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn collection(&self, tier: NoteTier) -> &Arc<RwLock<HashMap<NoteId, Note>>> {
        match tier {
            NoteTier::ShortTerm => &self.short_term,
            NoteTier::LongTerm => &self.long_term,
        }
    }

    /// Clear all stored data.
    pub async fn clear(&self) {
        self.short_term.write().await.clear();
        self.long_term.write().await.clear();
    }

    /// Number of rows in a tier's collection, archived rows included.
    pub async fn count(&self, tier: NoteTier) -> usize {
        self.collection(tier).read().await.len()
    }
}

#[async_trait]
impl NoteRepository for InMemoryNoteRepository {
    async fn insert(&self, owner: OwnerId, tier: NoteTier, draft: NoteDraft) -> RecallResult<Note> {
        let note = Note::create(owner, tier, draft);
        let mut notes = self.collection(tier).write().await;
        if notes.contains_key(&note.note_id) {
            return Err(StorageError::InsertFailed {
                tier,
                reason: "already exists".to_string(),
            }
            .into());
        }
        notes.insert(note.note_id, note.clone());
        Ok(note)
    }

    async fn fetch(
        &self,
        owner: OwnerId,
        id: NoteId,
        tier: NoteTier,
    ) -> RecallResult<Option<Note>> {
        let notes = self.collection(tier).read().await;
        Ok(notes.get(&id).filter(|n| n.owner_id == owner).cloned())
    }

    async fn update(
        &self,
        owner: OwnerId,
        id: NoteId,
        tier: NoteTier,
        update: NoteUpdate,
    ) -> RecallResult<Note> {
        let mut notes = self.collection(tier).write().await;
        let note = notes
            .get_mut(&id)
            .filter(|n| n.owner_id == owner)
            .ok_or(StorageError::NotFound { tier, id })?;

        if update.tier.is_some_and(|t| t != note.tier) {
            return Err(StorageError::UpdateFailed {
                tier,
                id,
                reason: "tier changes go through migration".to_string(),
            }
            .into());
        }

        if let Some(title) = update.title {
            note.title = title;
        }
        if let Some(content) = update.content {
            note.content_hash = compute_content_hash(content.as_bytes());
            note.content = content;
        }
        if let Some(tags) = update.tags {
            note.tags = tags;
        }
        if let Some(note_date) = update.note_date {
            note.note_date = note_date;
        }
        if let Some(metadata) = update.metadata {
            note.metadata = Some(metadata);
        }
        note.updated_at = Utc::now();

        Ok(note.clone())
    }

    async fn delete(&self, owner: OwnerId, id: NoteId, tier: NoteTier) -> RecallResult<Note> {
        let mut notes = self.collection(tier).write().await;
        match notes.get(&id) {
            Some(note) if note.owner_id == owner => {}
            _ => return Err(StorageError::NotFound { tier, id }.into()),
        }
        // The remove is the atomic decision point: once a row is gone, every
        // later delete of the same id observes NotFound.
        notes
            .remove(&id)
            .ok_or_else(|| StorageError::NotFound { tier, id }.into())
    }

    async fn archive(&self, owner: OwnerId, id: NoteId) -> RecallResult<Note> {
        let tier = NoteTier::ShortTerm;
        let mut notes = self.collection(tier).write().await;
        let note = notes
            .get_mut(&id)
            .filter(|n| n.owner_id == owner)
            .ok_or(StorageError::NotFound { tier, id })?;

        let now = Utc::now();
        note.archived_at = Some(now);
        note.updated_at = now;
        Ok(note.clone())
    }

    async fn list(
        &self,
        owner: OwnerId,
        tier: NoteTier,
        date: Option<NaiveDate>,
    ) -> RecallResult<Vec<Note>> {
        let notes = self.collection(tier).read().await;
        let mut result: Vec<Note> = notes
            .values()
            .filter(|n| n.owner_id == owner)
            .filter(|n| date.map_or(true, |d| n.note_date == d))
            .filter(|n| tier != NoteTier::ShortTerm || !n.is_archived())
            .cloned()
            .collect();
        result.sort_by_key(|n| n.created_at);
        Ok(result)
    }
}

// =============================================================================
// TESTS
// =============================================================================
