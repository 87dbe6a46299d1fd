//! Cached note service: the read/write facade over the repository.
//!
//! Reads go through the TTL cache; every successful mutation synchronously
//! invalidates the affected key families (always by prefix, never by full
//! key, so date-qualified variants die too) and then publishes a typed
//! event for fallback-store readers.

use std::sync::Arc;

use chrono::NaiveDate;
use recall_core::{
    EntityKind, Note, NoteDraft, NoteId, NoteTier, NoteUpdate, OwnerId, RecallResult, StorageError,
};
use recall_events::{NoteEvent, NoteEventBus};

use crate::cache::{invalidation_prefix, CacheKey, TtlCache};
use crate::repository::NoteRepository;

/// Two-tier note store with a TTL response cache in front.
///
/// Explicitly constructed with its repository, cache, and event bus - no
/// process-wide globals - so tests and multiple logical tenants within one
/// process do not interfere. The repository implementation (durable or
/// in-memory fallback) is chosen once here and never re-checked per call.
///
/// # Concurrency
///
/// No single-flight de-duplication: concurrent misses on one key each fetch
/// and the last `set` wins with an equivalent value. A miss-fill racing an
/// invalidation may re-populate a value that is already stale; the TTL
/// bounds that staleness and no extra locking is layered on top.
#[derive(Clone)]
pub struct NoteService {
    repo: Arc<dyn NoteRepository>,
    cache: Arc<TtlCache>,
    events: Arc<NoteEventBus>,
}

impl NoteService {
    /// Create a service over the given repository, cache, and event bus.
    pub fn new(repo: Arc<dyn NoteRepository>, cache: Arc<TtlCache>, events: Arc<NoteEventBus>) -> Self {
        Self { repo, cache, events }
    }

    /// The response cache.
    pub fn cache(&self) -> &TtlCache {
        &self.cache
    }

    /// The mutation event bus.
    pub fn events(&self) -> &NoteEventBus {
        &self.events
    }

    /// The backing repository.
    pub(crate) fn repo(&self) -> &Arc<dyn NoteRepository> {
        &self.repo
    }

    // ========================================================================
    // READS
    // ========================================================================

    /// List an owner's notes in a tier, optionally restricted to one date.
    ///
    /// Read-through: a cache hit returns immediately; on miss the repository
    /// result is cached with the default TTL and returned. A repository
    /// error propagates unchanged and populates nothing - a failed fetch is
    /// never cached as a negative result.
    pub async fn list(
        &self,
        owner: OwnerId,
        tier: NoteTier,
        date: Option<NaiveDate>,
    ) -> RecallResult<Vec<Note>> {
        let key = Self::list_key(owner, tier, date);

        if let Some(cached) = self.cache.get::<Vec<Note>>(&key)? {
            return Ok(cached);
        }

        let notes = self.repo.list(owner, tier, date).await?;
        self.cache.set(&key, &notes)?;
        Ok(notes)
    }

    /// Fetch one note by id, archived or not. Uncached: by-id reads are
    /// cheap at the repository and skipping the cache keeps them coherent.
    pub async fn get(
        &self,
        owner: OwnerId,
        id: NoteId,
        tier: NoteTier,
    ) -> RecallResult<Option<Note>> {
        self.repo.fetch(owner, id, tier).await
    }

    /// Days left before a short-term note counts as expired; `None` for
    /// long-term notes. Advisory, computed at read time.
    pub fn days_remaining(&self, note: &Note) -> Option<i64> {
        note.days_remaining()
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Create a note in the given tier.
    pub async fn create(
        &self,
        owner: OwnerId,
        tier: NoteTier,
        draft: NoteDraft,
    ) -> RecallResult<Note> {
        let note = self.repo.insert(owner, tier, draft).await?;

        self.invalidate_tier(owner, tier);
        self.events.publish(&NoteEvent::Created {
            owner_id: owner,
            note_id: note.note_id,
            tier,
        });
        tracing::debug!(owner_id = %owner, note_id = %note.note_id, tier = tier.as_str(), "note created");

        Ok(note)
    }

    /// Update a note's fields.
    ///
    /// If the update carries a `tier` that differs from the note's current
    /// tier, the call is re-routed to the migration path instead of being
    /// applied in place - tier is a partition key, not a column. Any other
    /// fields in the update are applied before the move so nothing the
    /// caller sent is dropped.
    pub async fn update(
        &self,
        owner: OwnerId,
        id: NoteId,
        update: NoteUpdate,
    ) -> RecallResult<Note> {
        let current = self.locate(owner, id).await?;

        match update.tier {
            Some(dest) if dest != current.tier => {
                let fields = NoteUpdate {
                    tier: None,
                    ..update
                };
                if fields != NoteUpdate::default() {
                    self.repo.update(owner, id, current.tier, fields).await?;
                }
                self.migrate(owner, id, current.tier, dest).await
            }
            _ => {
                let updated = self.repo.update(owner, id, current.tier, update).await?;

                self.invalidate_tier(owner, current.tier);
                self.events.publish(&NoteEvent::Updated {
                    owner_id: owner,
                    note_id: id,
                    tier: current.tier,
                });

                Ok(updated)
            }
        }
    }

    /// Delete a note with the tier's semantics: short-term notes are
    /// archived (soft delete, still fetchable by id), long-term notes are
    /// removed for good. The asymmetry is intentional.
    pub async fn delete(&self, owner: OwnerId, id: NoteId, tier: NoteTier) -> RecallResult<()> {
        match tier {
            NoteTier::ShortTerm => {
                self.repo.archive(owner, id).await?;
                self.invalidate_tier(owner, tier);
                self.events.publish(&NoteEvent::Archived {
                    owner_id: owner,
                    note_id: id,
                });
            }
            NoteTier::LongTerm => {
                self.repo.delete(owner, id, tier).await?;
                self.invalidate_tier(owner, tier);
                self.events.publish(&NoteEvent::Deleted {
                    owner_id: owner,
                    note_id: id,
                    tier,
                });
            }
        }
        tracing::debug!(owner_id = %owner, note_id = %id, tier = tier.as_str(), "note deleted");
        Ok(())
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    /// Find a note by id across both tiers; `NotFound` against the
    /// long-term tier if neither holds it.
    async fn locate(&self, owner: OwnerId, id: NoteId) -> RecallResult<Note> {
        if let Some(note) = self.repo.fetch(owner, id, NoteTier::ShortTerm).await? {
            return Ok(note);
        }
        self.repo
            .fetch(owner, id, NoteTier::LongTerm)
            .await?
            .ok_or_else(|| {
                StorageError::NotFound {
                    tier: NoteTier::LongTerm,
                    id,
                }
                .into()
            })
    }

    /// Cache key for a list query.
    ///
    /// Date-restricted short-term queries are the daily-notes view
    /// (`notes_{owner}_{date}`); tier-wide queries are the memory views
    /// (`memory_short_{owner}` / `memory_long_{owner}`).
    fn list_key(owner: OwnerId, tier: NoteTier, date: Option<NaiveDate>) -> CacheKey {
        match (tier, date) {
            (NoteTier::ShortTerm, Some(date)) => {
                CacheKey::owner_date(EntityKind::Notes, owner, date)
            }
            (NoteTier::ShortTerm, None) => CacheKey::owner(EntityKind::MemoryShort, owner),
            (NoteTier::LongTerm, Some(date)) => {
                CacheKey::owner_date(EntityKind::MemoryLong, owner, date)
            }
            (NoteTier::LongTerm, None) => CacheKey::owner(EntityKind::MemoryLong, owner),
        }
    }

    /// Invalidate every cached query family a mutation in the tier can have
    /// touched.
    pub(crate) fn invalidate_tier(&self, owner: OwnerId, tier: NoteTier) {
        match tier {
            NoteTier::ShortTerm => {
                self.cache
                    .invalidate_prefix(&invalidation_prefix(EntityKind::Notes, owner));
                self.cache
                    .invalidate_prefix(&invalidation_prefix(EntityKind::MemoryShort, owner));
            }
            NoteTier::LongTerm => {
                self.cache
                    .invalidate_prefix(&invalidation_prefix(EntityKind::MemoryLong, owner));
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
