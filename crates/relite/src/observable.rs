#![forbid(unsafe_code)]

//! Before/after change notification for named properties.
//!
//! # Design
//!
//! A type becomes observable by owning an [`ObservableObject<Self>`] and
//! implementing [`Observable`], whose only required method hands that
//! object out. Everything else is a default method:
//!
//! ```ignore
//! struct Person {
//!     observable: ObservableObject<Person>,
//!     age: i32,
//! }
//!
//! impl Person {
//!     const AGE: PropertyDescriptor<Person, i32> =
//!         PropertyDescriptor::new("age", |p| &p.age, |p| &mut p.age);
//!
//!     fn set_age(&mut self, age: i32) -> bool {
//!         self.set_property_value(Self::AGE, age)
//!     }
//! }
//!
//! impl Observable for Person {
//!     fn observable(&self) -> &ObservableObject<Self> {
//!         &self.observable
//!     }
//! }
//! ```
//!
//! A [`PropertyDescriptor`] names a logical property once, at the definition
//! site, together with accessors for the field backing it. Notifications
//! always carry the descriptor's name.
//!
//! # Invariants
//!
//! 1. `set_property_value` and `set_observable_property` notify only when
//!    the current value differs from the candidate.
//! 2. When they notify, `PropertyChanging` fires before the write and
//!    `PropertyChanged` after it, both with the same name.
//! 3. Handlers receive the owning object as sender; during `Changing` it still
//!    holds the old value, during `Changed` the new one.

use std::fmt;

use relite_core::SenderEvent;
use tracing::debug;

use crate::property::Property;

/// Payload of the `PropertyChanging` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChangingArgs {
    property_name: String,
}

impl PropertyChangingArgs {
    /// Payload naming `property_name`.
    #[must_use]
    pub fn new(property_name: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
        }
    }

    /// Name of the property that is changing.
    #[must_use]
    pub fn property_name(&self) -> &str {
        &self.property_name
    }
}

/// Payload of the `PropertyChanged` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChangedArgs {
    property_name: String,
}

impl PropertyChangedArgs {
    /// Payload naming `property_name`.
    #[must_use]
    pub fn new(property_name: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
        }
    }

    /// Name of the property that changed.
    #[must_use]
    pub fn property_name(&self) -> &str {
        &self.property_name
    }
}

/// Name plus field accessors for one property of `S` stored as a `T`.
pub struct PropertyDescriptor<S, T> {
    name: &'static str,
    field: fn(&S) -> &T,
    field_mut: fn(&mut S) -> &mut T,
}

impl<S, T> PropertyDescriptor<S, T> {
    #[must_use]
    pub const fn new(
        name: &'static str,
        field: fn(&S) -> &T,
        field_mut: fn(&mut S) -> &mut T,
    ) -> Self {
        Self {
            name,
            field,
            field_mut,
        }
    }

    /// Name carried by notifications for this property.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Borrow the backing field of `owner`.
    #[must_use]
    pub fn field<'a>(&self, owner: &'a S) -> &'a T {
        (self.field)(owner)
    }

    /// Mutably borrow the backing field of `owner`.
    pub fn field_mut<'a>(&self, owner: &'a mut S) -> &'a mut T {
        (self.field_mut)(owner)
    }
}

impl<S, T> Clone for PropertyDescriptor<S, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, T> Copy for PropertyDescriptor<S, T> {}

impl<S, T> fmt::Debug for PropertyDescriptor<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// The pair of change events embedded in an observable type `S`.
pub struct ObservableObject<S> {
    property_changing: SenderEvent<S, PropertyChangingArgs>,
    property_changed: SenderEvent<S, PropertyChangedArgs>,
}

impl<S: 'static> ObservableObject<S> {
    /// Both events, with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            property_changing: SenderEvent::new(),
            property_changed: SenderEvent::new(),
        }
    }

    /// Fires before a property is written.
    #[must_use]
    pub fn property_changing(&self) -> &SenderEvent<S, PropertyChangingArgs> {
        &self.property_changing
    }

    /// Fires after a property is written.
    #[must_use]
    pub fn property_changed(&self) -> &SenderEvent<S, PropertyChangedArgs> {
        &self.property_changed
    }
}

impl<S: 'static> Default for ObservableObject<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static> fmt::Debug for ObservableObject<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableObject")
            .field("property_changing", &self.property_changing)
            .field("property_changed", &self.property_changed)
            .finish()
    }
}

/// Types that report property changes through an embedded
/// [`ObservableObject`].
pub trait Observable: Sized + 'static {
    /// The embedded change events.
    fn observable(&self) -> &ObservableObject<Self>;

    /// Fires before a property is written, with `self` as sender.
    fn property_changing(&self) -> &SenderEvent<Self, PropertyChangingArgs> {
        self.observable().property_changing()
    }

    /// Fires after a property is written, with `self` as sender.
    fn property_changed(&self) -> &SenderEvent<Self, PropertyChangedArgs> {
        self.observable().property_changed()
    }

    /// Fire `PropertyChanging` for `name` with `self` as sender.
    fn notify_property_changing(&self, name: &str) {
        self.property_changing()
            .notify(self, PropertyChangingArgs::new(name));
    }

    /// Fire `PropertyChanged` for `name` with `self` as sender.
    fn notify_property_changed(&self, name: &str) {
        self.property_changed()
            .notify(self, PropertyChangedArgs::new(name));
    }

    /// Write `value` into a plain field, notifying around the write.
    ///
    /// Returns `false` without notifying when the field already equals
    /// `value`.
    fn set_property_value<T: PartialEq>(
        &mut self,
        property: PropertyDescriptor<Self, T>,
        value: T,
    ) -> bool {
        if *property.field(self) == value {
            return false;
        }
        self.notify_property_changing(property.name());
        *property.field_mut(self) = value;
        debug!(property = property.name(), "property changed");
        self.notify_property_changed(property.name());
        true
    }

    /// Route `value` through a [`Property`] field's setter, notifying around
    /// it.
    ///
    /// Gated on `get() != value`. Once past the gate both notifications fire
    /// even if the setter clamps or rejects the value.
    ///
    /// # Panics
    ///
    /// Panics if the property is unbound, or if its getter or setter panics.
    /// A setter panic escapes after `PropertyChanging` has fired.
    fn set_observable_property<T: Clone + PartialEq>(
        &mut self,
        property: PropertyDescriptor<Self, Property<T>>,
        value: T,
    ) -> bool {
        if *property.field(self) == value {
            return false;
        }
        self.notify_property_changing(property.name());
        property.field_mut(self).set(value);
        debug!(property = property.name(), "property changed");
        self.notify_property_changed(property.name());
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
