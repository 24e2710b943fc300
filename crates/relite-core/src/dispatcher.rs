#![forbid(unsafe_code)]

//! Shared handler registry behind every event type.
//!
//! The registry is the only shared mutable state in the crate. It lives in an
//! `Arc<Mutex<..>>` control block: the event owns the strong reference, every
//! [`Subscription`] it hands out owns a `Weak` one.
//!
//! # Invariants
//!
//! 1. Handler ids come from a per-registry counter and are never reused.
//! 2. The lock is held only for bookkeeping (insert, remove, snapshot), never
//!    while a handler runs.
//! 3. A handler closure removed from the map is dropped after the lock is
//!    released, so a handler that owns a [`ScopedSubscription`] to the same
//!    event can be torn down without re-entering a held lock.
//!
//! [`ScopedSubscription`]: crate::ScopedSubscription

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::trace;

use crate::subscription::{Detach, Subscription};

/// Identifier of one registration inside one registry.
pub(crate) type HandlerId = u64;

struct Registry<H: ?Sized> {
    last_id: HandlerId,
    /// Ordered by id, so iteration follows registration order.
    handlers: BTreeMap<HandlerId, Arc<H>>,
}

type ControlBlock<H> = Mutex<Registry<H>>;

/// Handlers never run under the lock, so poisoning can only come from a
/// panic inside bookkeeping; the map is still consistent in that case.
fn lock<H: ?Sized>(block: &ControlBlock<H>) -> MutexGuard<'_, Registry<H>> {
    block.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Registry handle owned by an event. `H` is the handler trait object.
pub(crate) struct Dispatcher<H: ?Sized> {
    block: Arc<ControlBlock<H>>,
}

impl<H: ?Sized + Send + Sync + 'static> Dispatcher<H> {
    pub(crate) fn new() -> Self {
        Self {
            block: Arc::new(Mutex::new(Registry {
                last_id: 0,
                handlers: BTreeMap::new(),
            })),
        }
    }

    /// Store `handler` under a fresh id and return its revocation handle.
    pub(crate) fn subscribe(&self, handler: Arc<H>) -> Subscription {
        let id = {
            let mut registry = lock(&self.block);
            registry.last_id += 1;
            let id = registry.last_id;
            registry.handlers.insert(id, handler);
            id
        };
        trace!(handler_id = id, "handler subscribed");
        Subscription::new(Box::new(RegistryHandle {
            block: Arc::downgrade(&self.block),
            id,
        }))
    }

    /// Copy of the current handler set, taken under the lock.
    pub(crate) fn snapshot(&self) -> Vec<Arc<H>> {
        lock(&self.block).handlers.values().cloned().collect()
    }

    pub(crate) fn len(&self) -> usize {
        lock(&self.block).handlers.len()
    }
}

/// Detach capability stored inside a [`Subscription`].
struct RegistryHandle<H: ?Sized> {
    block: Weak<ControlBlock<H>>,
    id: HandlerId,
}

impl<H: ?Sized + Send + Sync + 'static> Detach for RegistryHandle<H> {
    fn detach(&self) {
        let Some(block) = self.block.upgrade() else {
            trace!(handler_id = self.id, "detach skipped, event already dropped");
            return;
        };
        let removed = lock(&block).handlers.remove(&self.id);
        trace!(
            handler_id = self.id,
            removed = removed.is_some(),
            "handler detached"
        );
        // Dropped here, outside the lock.
        drop(removed);
    }

    fn is_attached(&self) -> bool {
        self.block
            .upgrade()
            .is_some_and(|block| lock(&block).handlers.contains_key(&self.id))
    }
}
