//! Subscription registry for the single inbound interaction stream.
//!
//! The bot layer publishes every interaction here; the command router and each
//! live menu subscribe. Subscribers get a [`Subscription`] handle that removes
//! them exactly once, either explicitly or on drop.

use crate::core::interaction::{Interaction, InteractionKind};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::trace;

/// Callback invoked for every matching interaction.
///
/// Callbacks run on the publishing task and must not block; anything slow
/// belongs in a spawned task.
pub type Callback = Arc<dyn Fn(Arc<Interaction>) + Send + Sync>;

struct Entry {
    kind: InteractionKind,
    callback: Callback,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    // Ordered by subscription id, which is the delivery order
    entries: BTreeMap<u64, Entry>,
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    // Callbacks never run under the lock, so a poisoned registry is still consistent
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The shared interaction event source.
#[derive(Clone, Default)]
pub struct EventSource {
    registry: Arc<Mutex<Registry>>,
}

impl std::fmt::Debug for EventSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSource")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl EventSource {
    /// Creates an event source with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for every interaction of `kind`.
    pub fn subscribe<F>(&self, kind: InteractionKind, callback: F) -> Subscription
    where
        F: Fn(Arc<Interaction>) + Send + Sync + 'static,
    {
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.insert(
            id,
            Entry {
                kind,
                callback: Arc::new(callback),
            },
        );
        trace!(id, ?kind, "subscriber added");

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Delivers an interaction to every subscriber of its kind, in subscription order.
    ///
    /// Delivery works on a snapshot taken before the first callback runs, so
    /// callbacks may freely subscribe or unsubscribe. Returns the number of
    /// callbacks invoked.
    pub fn publish(&self, interaction: Interaction) -> usize {
        let interaction = Arc::new(interaction);
        let kind = interaction.kind();
        let snapshot: Vec<Callback> = lock(&self.registry)
            .entries
            .values()
            .filter(|entry| entry.kind == kind)
            .map(|entry| Arc::clone(&entry.callback))
            .collect();

        for callback in &snapshot {
            callback(Arc::clone(&interaction));
        }
        snapshot.len()
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        lock(&self.registry).entries.len()
    }
}

/// Disposable handle for one subscriber.
#[derive(Debug)]
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Removes the subscriber. Equivalent to dropping the handle.
    pub fn unsubscribe(self) {
        drop(self);
    }

    fn release(&self) {
        if let Some(registry) = self.registry.upgrade() {
            if lock(&registry).entries.remove(&self.id).is_some() {
                trace!(id = self.id, "subscriber removed");
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}
