//! Recall Events - Typed Mutation Events and Subscriber Bus
//!
//! This crate defines the event payloads emitted after every note mutation
//! and the bus that fans them out to registered subscribers.
//!
//! # Architecture
//!
//! The bus exists so independently-instantiated readers of the in-memory
//! fallback store (a daily-notes view and a memory view over the same data)
//! can re-synchronize after a mutation. With a durable backend nobody
//! subscribes and publishing is a no-op.
//!
//! Delivery is synchronous and in registration order. A panicking subscriber
//! is contained and logged; later subscribers still run. The bus is
//! process-wide fan-out, not per-owner - callbacks that need isolation
//! filter on the event's `owner_id` themselves.

mod bus;
mod event;

pub use bus::{NoteEventBus, SubscriptionId};
pub use event::NoteEvent;
