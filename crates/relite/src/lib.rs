#![forbid(unsafe_code)]

//! Reactive building blocks: properties, observable objects and observable
//! collections, on top of the events in [`relite_core`].
//!
//! # Role in relite
//! `relite` is the public facade. It re-exports every `relite-core` type, so
//! applications depend on this crate alone.
//!
//! # Primary responsibilities
//! - **Property / ReadonlyProperty**: values read and written through
//!   pluggable accessor strategies.
//! - **Observable**: equality-gated `PropertyChanging` / `PropertyChanged`
//!   notification for types embedding an [`ObservableObject`].
//! - **ObservableCollection**: a sequence raising `CollectionChanging` /
//!   `CollectionChanged` around structural mutation, plus a read-only view.
//!
//! # Example
//! ```
//! use relite::{ChangeKind, ObservableCollection};
//!
//! let mut items = ObservableCollection::new();
//! let _sub = items.collection_changed().subscribe(|list, args| {
//!     assert_eq!(args.change, ChangeKind::Add);
//!     assert_eq!(list.len(), args.new_count);
//! });
//! items.push("first");
//! ```

pub mod collection;
pub mod error;
pub mod observable;
pub mod property;

pub use collection::{
    ChangeKind, CollectionChangedArgs, CollectionChangingArgs, CollectionEvent,
    ObservableCollection, ReadonlyObservableCollection,
};
pub use error::{ReactiveError, Result};
pub use observable::{
    Observable, ObservableObject, PropertyChangedArgs, PropertyChangingArgs, PropertyDescriptor,
};
pub use property::{AutoGetter, AutoSetter, Getter, Property, ReadonlyProperty, Setter};
pub use relite_core::{
    Detach, Event, Handler, ScopedSubscription, SenderEvent, SenderHandler, Subscription,
};
