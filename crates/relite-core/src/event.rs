#![forbid(unsafe_code)]

//! Typed multicast events.
//!
//! # Design
//!
//! [`Event<A>`] delivers one argument value to every registered handler.
//! Several arguments travel as a tuple (`Event<(String, i32)>`), none as
//! `Event<()>`. [`SenderEvent<S, A>`] additionally passes a reference to the
//! object raising the event, which is how observable objects and collections
//! hand themselves to their subscribers.
//!
//! Both are thin typed fronts over the same dispatcher (see the
//! `dispatcher` module): a mutex-guarded registry in a reference-counted
//! control block.
//!
//! # Notification
//!
//! `notify` copies the current handler list under the lock, releases the
//! lock, then calls each handler in registration order. Consequences:
//!
//! - A handler may subscribe, unsubscribe itself or others, or notify this or
//!   any other event while it runs.
//! - A handler added during a notify is first called by the next notify.
//! - A handler removed during a notify by another handler is still called in
//!   the current round if it was part of the copy.
//!
//! # Failure Modes
//!
//! - **Panicking handler**: the panic propagates out of `notify`; handlers
//!   after it in the copy are not called for that round. Handlers already
//!   called are not rolled back. The registry stays usable.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::dispatcher::Dispatcher;
use crate::subscription::{ScopedSubscription, Subscription};

/// Handler signature of [`Event<A>`].
pub type Handler<A> = dyn Fn(&A) + Send + Sync;

/// Handler signature of [`SenderEvent<S, A>`].
pub type SenderHandler<S, A> = dyn Fn(&S, &A) + Send + Sync;

/// A thread-safe multicast event carrying a value of type `A`.
///
/// Events are not `Clone`: a registry has exactly one owner. Dropping the
/// event invalidates every outstanding [`Subscription`].
pub struct Event<A> {
    dispatcher: Dispatcher<Handler<A>>,
}

impl<A: 'static> Event<A> {
    /// Create an event with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dispatcher: Dispatcher::new(),
        }
    }

    /// Register `handler` and return the handle that revokes it.
    pub fn subscribe(&self, handler: impl Fn(&A) + Send + Sync + 'static) -> Subscription {
        let handler: Arc<Handler<A>> = Arc::new(handler);
        self.dispatcher.subscribe(handler)
    }

    /// Register `handler` for as long as the returned guard lives.
    #[must_use = "dropping a ScopedSubscription immediately unsubscribes"]
    pub fn subscribe_scoped(
        &self,
        handler: impl Fn(&A) + Send + Sync + 'static,
    ) -> ScopedSubscription {
        ScopedSubscription::new(self.subscribe(handler))
    }

    /// Call every currently registered handler with `args`.
    ///
    /// # Panics
    ///
    /// Propagates the first handler panic; later handlers are skipped.
    pub fn notify(&self, args: A) {
        let handlers = self.dispatcher.snapshot();
        trace!(handlers = handlers.len(), "notify");
        for handler in &handlers {
            handler(&args);
        }
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.dispatcher.len()
    }

    /// `true` if no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handler_count() == 0
    }
}

impl<A: 'static> Default for Event<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: 'static> fmt::Debug for Event<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("handlers", &self.handler_count())
            .finish()
    }
}

/// A thread-safe multicast event whose handlers also receive the sender.
///
/// `S` is the type raising the event, usually the struct that owns it.
pub struct SenderEvent<S: ?Sized, A> {
    dispatcher: Dispatcher<SenderHandler<S, A>>,
}

impl<S: ?Sized + 'static, A: 'static> SenderEvent<S, A> {
    /// Create an event with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dispatcher: Dispatcher::new(),
        }
    }

    /// Register `handler` and return the handle that revokes it.
    pub fn subscribe(
        &self,
        handler: impl Fn(&S, &A) + Send + Sync + 'static,
    ) -> Subscription {
        let handler: Arc<SenderHandler<S, A>> = Arc::new(handler);
        self.dispatcher.subscribe(handler)
    }

    /// Register `handler` for as long as the returned guard lives.
    #[must_use = "dropping a ScopedSubscription immediately unsubscribes"]
    pub fn subscribe_scoped(
        &self,
        handler: impl Fn(&S, &A) + Send + Sync + 'static,
    ) -> ScopedSubscription {
        ScopedSubscription::new(self.subscribe(handler))
    }

    /// Call every currently registered handler with `sender` and `args`.
    ///
    /// # Panics
    ///
    /// Propagates the first handler panic; later handlers are skipped.
    pub fn notify(&self, sender: &S, args: A) {
        let handlers = self.dispatcher.snapshot();
        trace!(handlers = handlers.len(), "notify");
        for handler in &handlers {
            handler(sender, &args);
        }
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.dispatcher.len()
    }

    /// `true` if no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handler_count() == 0
    }
}

impl<S: ?Sized + 'static, A: 'static> Default for SenderEvent<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ?Sized + 'static, A: 'static> fmt::Debug for SenderEvent<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SenderEvent")
            .field("handlers", &self.handler_count())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
