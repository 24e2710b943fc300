#![forbid(unsafe_code)]

//! Revocable handles for event registrations.
//!
//! # Design
//!
//! A [`Subscription`] is type-erased: it holds a boxed [`Detach`] capability
//! that knows how to remove one handler from one dispatcher and how to ask
//! whether that handler is still registered. Subscriptions from events with
//! different argument types can therefore live in the same `Vec`.
//!
//! The capability only holds a `Weak` reference to the dispatcher's control
//! block, so a subscription may outlive its event. Once the event is gone,
//! [`Subscription::is_valid`] reports `false` and
//! [`Subscription::unsubscribe`] does nothing.
//!
//! # Ownership
//!
//! | Type                   | Detaches on drop | Clone | Send + Sync |
//! |------------------------|------------------|-------|-------------|
//! | [`Subscription`]       | no               | no    | yes         |
//! | [`ScopedSubscription`] | yes              | no    | yes         |

use std::fmt;

/// The detach capability behind a [`Subscription`].
///
/// Implemented by the event dispatcher; not meant to be implemented outside
/// this crate, but public so that `Subscription` stays object-safe to build.
pub trait Detach: Send + Sync {
    /// Remove the handler from its dispatcher. Must be a no-op if the
    /// dispatcher no longer exists.
    fn detach(&self);

    /// Whether the handler is still registered in a live dispatcher.
    fn is_attached(&self) -> bool;
}

/// A revocable handle to one handler registration.
///
/// Dropping a `Subscription` does **not** remove the handler; call
/// [`unsubscribe`](Self::unsubscribe) or wrap it in a [`ScopedSubscription`].
#[derive(Default)]
pub struct Subscription {
    handle: Option<Box<dyn Detach>>,
}

impl Subscription {
    /// Wrap a detach capability.
    pub fn new(handle: Box<dyn Detach>) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    /// A subscription bound to nothing. `is_valid()` is `false`.
    #[must_use]
    pub fn empty() -> Self {
        Self { handle: None }
    }

    /// Remove the handler from its event.
    ///
    /// Idempotent, and safe to call after the event has been dropped.
    pub fn unsubscribe(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.detach();
        }
    }

    /// `true` while the handler is registered in a live event.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| h.is_attached())
    }

    /// Convert into a [`ScopedSubscription`] that detaches on drop.
    #[must_use = "dropping a ScopedSubscription immediately unsubscribes"]
    pub fn scoped(self) -> ScopedSubscription {
        ScopedSubscription::new(self)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("bound", &self.handle.is_some())
            .field("valid", &self.is_valid())
            .finish()
    }
}

/// RAII owner of a [`Subscription`].
///
/// The held subscription is detached when the guard is dropped, including
/// when a new guard is assigned over it. Moving the guard moves ownership.
#[derive(Default)]
pub struct ScopedSubscription {
    subscription: Subscription,
}

impl ScopedSubscription {
    /// Take ownership of `subscription`.
    #[must_use = "dropping a ScopedSubscription immediately unsubscribes"]
    pub fn new(subscription: Subscription) -> Self {
        Self { subscription }
    }

    /// `true` while the owned handler is registered in a live event.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.subscription.is_valid()
    }

    /// Detach now instead of at drop.
    pub fn unsubscribe(&mut self) {
        self.subscription.unsubscribe();
    }

    /// Give the subscription back without detaching it.
    #[must_use]
    pub fn release(mut self) -> Subscription {
        std::mem::take(&mut self.subscription)
    }
}

impl From<Subscription> for ScopedSubscription {
    fn from(subscription: Subscription) -> Self {
        Self::new(subscription)
    }
}

impl Drop for ScopedSubscription {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}

impl fmt::Debug for ScopedSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ScopedSubscription")
            .field(&self.subscription)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
