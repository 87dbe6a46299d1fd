//! Subscriber bus with synchronous, in-order fan-out

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, RwLock};

use crate::NoteEvent;

/// Handle returned by [`NoteEventBus::subscribe`], used to unsubscribe.
pub type SubscriptionId = u64;

type Subscriber = Arc<dyn Fn(&NoteEvent) + Send + Sync>;

struct BusInner {
    next_id: SubscriptionId,
    /// Registration order is delivery order.
    subscribers: Vec<(SubscriptionId, Subscriber)>,
}

/// Fan-out list of callbacks invoked after every note mutation.
///
/// Explicitly constructed and passed into the service that publishes to it -
/// never a module-level global - so tests and multiple logical tenants in
/// one process do not interfere.
pub struct NoteEventBus {
    inner: RwLock<BusInner>,
}

impl NoteEventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BusInner {
                next_id: 0,
                subscribers: Vec::new(),
            }),
        }
    }

    /// Register a callback. Callbacks run synchronously on the publishing
    /// thread, in registration order.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&NoteEvent) + Send + Sync + 'static,
    {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push((id, Arc::new(callback)));
        id
    }

    /// Remove a callback. Returns false if the id was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let before = inner.subscribers.len();
        inner.subscribers.retain(|(sub_id, _)| *sub_id != id);
        inner.subscribers.len() != before
    }

    /// Invoke every currently-registered callback with the event, in
    /// registration order. Returns the number of callbacks invoked.
    ///
    /// A panicking callback is contained so the remaining callbacks still
    /// run; the panic is logged and otherwise dropped.
    pub fn publish(&self, event: &NoteEvent) -> usize {
        // Snapshot under the lock, invoke outside it, so callbacks may
        // subscribe or unsubscribe without deadlocking.
        let snapshot: Vec<(SubscriptionId, Subscriber)> = {
            let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
            inner.subscribers.clone()
        };

        for (id, callback) in &snapshot {
            if catch_unwind(AssertUnwindSafe(|| (callback.as_ref())(event))).is_err() {
                tracing::warn!(subscription_id = *id, ?event, "note event subscriber panicked");
            }
        }

        snapshot.len()
    }

    /// Number of registered callbacks.
    pub fn subscriber_count(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.subscribers.len()
    }
}

impl Default for NoteEventBus {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================
