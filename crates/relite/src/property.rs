#![forbid(unsafe_code)]

//! Value cells with pluggable get/set behaviour.
//!
//! # Design
//!
//! A [`Property<T>`] routes every read and write through exactly one binding
//! strategy, fixed when the property is built:
//!
//! | Constructor                                   | Storage  | Read path            | Write path                    |
//! |-----------------------------------------------|----------|----------------------|-------------------------------|
//! | [`Property::new`] / `From<T>` / `Default`     | internal | clone                | replace                       |
//! | [`Property::with_accessors`]                  | caller's | `get()`              | `set(&mut incoming)`          |
//! | [`Property::with_auto_accessors`] (`_from`)   | internal | `get(&mut internal)` | `set(&mut incoming, &mut internal)` |
//! | [`Property::unbound`]                         | none     | error                | error                         |
//!
//! Closures are kept behind `Arc`, so cloning a property shares them and,
//! with them, whatever state they captured. Internal storage is cloned.
//!
//! The property itself never validates: a setter closure may clamp, rewrite,
//! ignore or reject the incoming value. A closure that panics leaves the
//! property as the closure left it.
//!
//! # Failure Modes
//!
//! - **Unbound property**: `get`/`set` panic with
//!   [`ReactiveError::UnboundProperty`]; `try_get`/`try_set` return it.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{ReactiveError, Result};

/// Getter of a custom-bound property.
pub type Getter<T> = Arc<dyn Fn() -> T + Send + Sync>;
/// Setter of a custom-bound property; receives the incoming value.
pub type Setter<T> = Arc<dyn Fn(&mut T) + Send + Sync>;
/// Getter of an auto-bound property; receives the internal value.
pub type AutoGetter<T> = Arc<dyn Fn(&mut T) -> T + Send + Sync>;
/// Setter of an auto-bound property; receives the incoming and the internal value.
pub type AutoSetter<T> = Arc<dyn Fn(&mut T, &mut T) + Send + Sync>;

enum Binding<T> {
    Unbound,
    Custom {
        get: Getter<T>,
        set: Setter<T>,
    },
    Auto {
        /// Locked so that `get(&self)` can lend the getter a `&mut T`.
        value: Mutex<T>,
        get: AutoGetter<T>,
        set: AutoSetter<T>,
    },
    Stored(T),
}

fn lock<T>(value: &Mutex<T>) -> MutexGuard<'_, T> {
    value.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A value accessed through a getter/setter strategy.
pub struct Property<T> {
    binding: Binding<T>,
}

impl<T> Property<T> {
    /// Internally stored value with plain get/set.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            binding: Binding::Stored(value),
        }
    }

    /// A property with no strategy. Any access fails.
    #[must_use]
    pub fn unbound() -> Self {
        Self {
            binding: Binding::Unbound,
        }
    }

    /// Caller-owned storage reached through `get` and `set`.
    ///
    /// The setter receives the incoming value by `&mut` and decides alone
    /// whether and how to apply it.
    #[must_use]
    pub fn with_accessors(
        get: impl Fn() -> T + Send + Sync + 'static,
        set: impl Fn(&mut T) + Send + Sync + 'static,
    ) -> Self {
        Self {
            binding: Binding::Custom {
                get: Arc::new(get),
                set: Arc::new(set),
            },
        }
    }

    /// Internal storage starting at `initial`, read and written only through
    /// the given closures.
    #[must_use]
    pub fn with_auto_accessors_from(
        initial: T,
        get: impl Fn(&mut T) -> T + Send + Sync + 'static,
        set: impl Fn(&mut T, &mut T) + Send + Sync + 'static,
    ) -> Self {
        Self {
            binding: Binding::Auto {
                value: Mutex::new(initial),
                get: Arc::new(get),
                set: Arc::new(set),
            },
        }
    }

    /// `true` unless built with [`Property::unbound`].
    #[must_use]
    pub fn is_bound(&self) -> bool {
        !matches!(self.binding, Binding::Unbound)
    }

    /// Route `value` to the bound setter.
    pub fn try_set(&mut self, mut value: T) -> Result<()> {
        match &mut self.binding {
            Binding::Unbound => return Err(ReactiveError::UnboundProperty),
            Binding::Custom { set, .. } => set(&mut value),
            Binding::Auto {
                value: internal,
                set,
                ..
            } => {
                let internal = internal.get_mut().unwrap_or_else(PoisonError::into_inner);
                set(&mut value, internal);
            }
            Binding::Stored(stored) => *stored = value,
        }
        Ok(())
    }

    /// Route `value` to the bound setter.
    ///
    /// # Panics
    ///
    /// Panics if the property is unbound, or if the setter panics.
    pub fn set(&mut self, value: T) {
        if let Err(err) = self.try_set(value) {
            panic!("{err}");
        }
    }

    fn strategy(&self) -> &'static str {
        match self.binding {
            Binding::Unbound => "unbound",
            Binding::Custom { .. } => "custom",
            Binding::Auto { .. } => "auto",
            Binding::Stored(_) => "stored",
        }
    }
}

impl<T: Default> Property<T> {
    /// Like [`with_auto_accessors_from`](Self::with_auto_accessors_from),
    /// starting from `T::default()`.
    #[must_use]
    pub fn with_auto_accessors(
        get: impl Fn(&mut T) -> T + Send + Sync + 'static,
        set: impl Fn(&mut T, &mut T) + Send + Sync + 'static,
    ) -> Self {
        Self::with_auto_accessors_from(T::default(), get, set)
    }
}

impl<T: Clone> Property<T> {
    /// Read through the bound getter.
    pub fn try_get(&self) -> Result<T> {
        match &self.binding {
            Binding::Unbound => Err(ReactiveError::UnboundProperty),
            Binding::Custom { get, .. } => Ok(get()),
            Binding::Auto { value, get, .. } => Ok(get(&mut *lock(value))),
            Binding::Stored(value) => Ok(value.clone()),
        }
    }

    /// Read through the bound getter.
    ///
    /// # Panics
    ///
    /// Panics if the property is unbound, or if the getter panics.
    #[must_use]
    pub fn get(&self) -> T {
        match self.try_get() {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T: Clone> Clone for Property<T> {
    fn clone(&self) -> Self {
        let binding = match &self.binding {
            Binding::Unbound => Binding::Unbound,
            Binding::Custom { get, set } => Binding::Custom {
                get: Arc::clone(get),
                set: Arc::clone(set),
            },
            Binding::Auto { value, get, set } => Binding::Auto {
                value: Mutex::new(lock(value).clone()),
                get: Arc::clone(get),
                set: Arc::clone(set),
            },
            Binding::Stored(value) => Binding::Stored(value.clone()),
        };
        Self { binding }
    }
}

impl<T> From<T> for Property<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + PartialEq> PartialEq<T> for Property<T> {
    fn eq(&self, other: &T) -> bool {
        self.get() == *other
    }
}

impl<T: Clone + fmt::Display> fmt::Display for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.get().fmt(f)
    }
}

impl<T> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("strategy", &self.strategy())
            .finish_non_exhaustive()
    }
}

/// A getter-only property, typically computed from other state.
pub struct ReadonlyProperty<T> {
    get: Getter<T>,
}

impl<T> ReadonlyProperty<T> {
    /// A property whose value is recomputed by `get` on every read.
    #[must_use]
    pub fn new(get: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self { get: Arc::new(get) }
    }

    /// Run the getter.
    #[must_use]
    pub fn get(&self) -> T {
        (self.get)()
    }
}

impl<T> Clone for ReadonlyProperty<T> {
    fn clone(&self) -> Self {
        Self {
            get: Arc::clone(&self.get),
        }
    }
}

impl<T: PartialEq> PartialEq<T> for ReadonlyProperty<T> {
    fn eq(&self, other: &T) -> bool {
        self.get() == *other
    }
}

impl<T: fmt::Display> fmt::Display for ReadonlyProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.get().fmt(f)
    }
}

impl<T> fmt::Debug for ReadonlyProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadonlyProperty").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
