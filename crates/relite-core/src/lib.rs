#![forbid(unsafe_code)]

//! Core: multicast events and revocable subscriptions.
//!
//! # Role in relite
//! `relite-core` is the dispatch layer. Properties, observable objects and
//! observable collections in the `relite` crate raise all of their
//! notifications through the types defined here.
//!
//! # Primary responsibilities
//! - **Event / SenderEvent**: typed multicast dispatch with
//!   snapshot-before-invoke semantics.
//! - **Subscription**: type-erased, revocable handle that survives its event.
//! - **ScopedSubscription**: RAII guard that revokes on drop.
//!
//! # Concurrency
//! Registry bookkeeping (subscribe, unsubscribe, snapshot) is serialized by a
//! mutex that is never held while a handler runs. Events are `Send + Sync`;
//! handlers must be as well.

mod dispatcher;
pub mod event;
pub mod subscription;

pub use event::{Event, Handler, SenderEvent, SenderHandler};
pub use subscription::{Detach, ScopedSubscription, Subscription};
