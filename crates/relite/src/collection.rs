#![forbid(unsafe_code)]

//! A `Vec`-backed sequence that reports structural changes.
//!
//! # Design
//!
//! [`ObservableCollection<T>`] owns its items and two sender events. Every
//! structural mutation runs the same protocol:
//!
//! 1. compute the change kind, the affected index, the current count and
//!    the count the mutation will produce;
//! 2. fire `CollectionChanging` with those values;
//! 3. apply the mutation;
//! 4. fire `CollectionChanged` with the same values.
//!
//! The affected index is the insertion position for `push`/`insert`
//! (`push` uses the old count), the removed position for `remove`, the first
//! removed position for `remove_range`, and `0` for `clear`.
//!
//! Reads and in-place element edits (`get_mut`, `iter_mut`, `IndexMut`) are
//! not structural and fire nothing.
//!
//! The collection is also [`Observable`]: it embeds an
//! [`ObservableObject`], so `PropertyChanging` / `PropertyChanged` are
//! available for owner-defined properties. Structural mutation never raises
//! them; `count()` is reported through the collection events instead.
//!
//! [`ReadonlyObservableCollection`] is a borrowed view exposing the read
//! surface and both events, with no way to mutate.
//!
//! # Invariants
//!
//! 1. `new_count` in both payloads equals `len()` once the mutation is done.
//! 2. Changing handlers see the collection before the mutation; Changed
//!    handlers see it after.
//! 3. Index and range checks happen before any notification, so a rejected
//!    call fires nothing.
//! 4. Clearing an empty collection and removing an empty range fire nothing.
//!
//! # Failure Modes
//!
//! - **Out-of-bounds index or range**: `insert`, `emplace`, `remove` and
//!   `remove_range` panic with the [`ReactiveError`] message; the `try_*`
//!   twins return it.
//! - **Panicking handler**: propagates. A panic in a Changing handler leaves
//!   the collection untouched; a panic in a Changed handler leaves it
//!   mutated.

use std::fmt;
use std::ops::{Bound, Index, IndexMut, RangeBounds};
use std::slice;

use relite_core::SenderEvent;
use tracing::debug;

use crate::error::{ReactiveError, Result};
use crate::observable::{
    Observable, ObservableObject, PropertyChangedArgs, PropertyChangingArgs,
};

/// Kind of structural change reported by a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// Element appended at the end.
    Add,
    /// One or more elements removed.
    Remove,
    /// All elements removed.
    Clear,
    /// Element inserted at a position.
    Insert,
    /// Reserved for changes that fit no other kind. Never raised by
    /// [`ObservableCollection`] itself.
    Unknown,
}

/// Payload of `CollectionChanging`, raised before a structural mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionChangingArgs {
    pub change: ChangeKind,
    pub index: usize,
    pub old_count: usize,
    pub new_count: usize,
}

/// Payload of `CollectionChanged`, raised after a structural mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionChangedArgs {
    pub change: ChangeKind,
    pub index: usize,
    pub old_count: usize,
    pub new_count: usize,
}

/// Handler-visible sender type of both collection events.
pub type CollectionEvent<T, A> = SenderEvent<ObservableCollection<T>, A>;

/// A growable sequence that raises change events around every structural
/// mutation.
pub struct ObservableCollection<T> {
    items: Vec<T>,
    collection_changing: CollectionEvent<T, CollectionChangingArgs>,
    collection_changed: CollectionEvent<T, CollectionChangedArgs>,
    observable: ObservableObject<ObservableCollection<T>>,
}

impl<T: 'static> ObservableCollection<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::from(Vec::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from(Vec::with_capacity(capacity))
    }

    /// Fires before each structural mutation.
    #[must_use]
    pub fn collection_changing(&self) -> &CollectionEvent<T, CollectionChangingArgs> {
        &self.collection_changing
    }

    /// Fires after each structural mutation.
    #[must_use]
    pub fn collection_changed(&self) -> &CollectionEvent<T, CollectionChangedArgs> {
        &self.collection_changed
    }

    /// Borrow a read-only view of this collection.
    #[must_use]
    pub fn as_readonly(&self) -> ReadonlyObservableCollection<'_, T> {
        ReadonlyObservableCollection { inner: self }
    }

    fn mutate<R>(
        &mut self,
        change: ChangeKind,
        index: usize,
        new_count: usize,
        apply: impl FnOnce(&mut Vec<T>) -> R,
    ) -> R {
        let old_count = self.items.len();
        self.collection_changing.notify(
            self,
            CollectionChangingArgs {
                change,
                index,
                old_count,
                new_count,
            },
        );

        let out = apply(&mut self.items);
        debug_assert_eq!(self.items.len(), new_count);
        debug!(?change, index, old_count, new_count, "collection changed");

        self.collection_changed.notify(
            self,
            CollectionChangedArgs {
                change,
                index,
                old_count,
                new_count,
            },
        );
        out
    }

    // ---- structural mutation ----

    /// Append `value`.
    pub fn push(&mut self, value: T) {
        let len = self.items.len();
        self.mutate(ChangeKind::Add, len, len + 1, |items| items.push(value));
    }

    /// Append the value built by `make` and return it.
    ///
    /// `make` runs between the two notifications.
    pub fn emplace_back(&mut self, make: impl FnOnce() -> T) -> &mut T {
        let len = self.items.len();
        self.mutate(ChangeKind::Add, len, len + 1, |items| items.push(make()));
        &mut self.items[len]
    }

    /// Insert `value` at `index`, shifting later elements right.
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<()> {
        let len = self.check_position(index)?;
        self.mutate(ChangeKind::Insert, index, len + 1, |items| {
            items.insert(index, value);
        });
        Ok(())
    }

    /// Insert `value` at `index`, shifting later elements right.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    pub fn insert(&mut self, index: usize, value: T) {
        if let Err(err) = self.try_insert(index, value) {
            panic!("{err}");
        }
    }

    /// Insert the value built by `make` at `index` and return it.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`. `make` is not called in that case.
    pub fn emplace(&mut self, index: usize, make: impl FnOnce() -> T) -> &mut T {
        let len = match self.check_position(index) {
            Ok(len) => len,
            Err(err) => panic!("{err}"),
        };
        self.mutate(ChangeKind::Insert, index, len + 1, |items| {
            items.insert(index, make());
        });
        &mut self.items[index]
    }

    /// Remove and return the element at `index`.
    pub fn try_remove(&mut self, index: usize) -> Result<T> {
        let len = self.items.len();
        if index >= len {
            return Err(ReactiveError::IndexOutOfBounds { index, len });
        }
        Ok(self.mutate(ChangeKind::Remove, index, len - 1, |items| {
            items.remove(index)
        }))
    }

    /// Remove and return the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn remove(&mut self, index: usize) -> T {
        match self.try_remove(index) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    /// Remove the elements in `range` and return them in order.
    ///
    /// An empty range returns an empty `Vec` and fires nothing.
    pub fn try_remove_range(&mut self, range: impl RangeBounds<usize>) -> Result<Vec<T>> {
        let len = self.items.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        };
        if start > end || end > len {
            return Err(ReactiveError::InvalidRange { start, end, len });
        }
        if start == end {
            return Ok(Vec::new());
        }
        Ok(self.mutate(ChangeKind::Remove, start, len - (end - start), |items| {
            items.drain(start..end).collect()
        }))
    }

    /// Remove the elements in `range` and return them in order.
    ///
    /// # Panics
    ///
    /// Panics if the range is reversed or extends past `len()`.
    pub fn remove_range(&mut self, range: impl RangeBounds<usize>) -> Vec<T> {
        match self.try_remove_range(range) {
            Ok(removed) => removed,
            Err(err) => panic!("{err}"),
        }
    }

    /// Remove every element. Does nothing on an empty collection.
    pub fn clear(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.mutate(ChangeKind::Clear, 0, 0, Vec::clear);
    }

    fn check_position(&self, index: usize) -> Result<usize> {
        let len = self.items.len();
        if index > len {
            return Err(ReactiveError::IndexOutOfBounds { index, len });
        }
        Ok(len)
    }
}

impl<T> ObservableCollection<T> {
    // ---- read surface ----

    /// Current number of elements. Read-only: only mutations change it.
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.items.reserve(additional);
    }

    pub fn shrink_to_fit(&mut self) {
        self.items.shrink_to_fit();
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.items.contains(value)
    }

    /// Take the items out. Registered handlers are dropped with the events.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: 'static> Default for ObservableCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> From<Vec<T>> for ObservableCollection<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            items,
            collection_changing: SenderEvent::new(),
            collection_changed: SenderEvent::new(),
            observable: ObservableObject::new(),
        }
    }
}

impl<T: 'static> FromIterator<T> for ObservableCollection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

/// Appends one element at a time, each with its own notification pair.
impl<T: 'static> Extend<T> for ObservableCollection<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> Index<usize> for ObservableCollection<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for ObservableCollection<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<'a, T> IntoIterator for &'a ObservableCollection<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut ObservableCollection<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter_mut()
    }
}

impl<T: PartialEq> PartialEq for ObservableCollection<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for ObservableCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableCollection")
            .field("items", &self.items)
            .field("collection_changing", &self.collection_changing)
            .field("collection_changed", &self.collection_changed)
            .field("observable", &self.observable)
            .finish()
    }
}

impl<T: 'static> Observable for ObservableCollection<T> {
    fn observable(&self) -> &ObservableObject<Self> {
        &self.observable
    }
}

/// Read-only view over an [`ObservableCollection`].
pub struct ReadonlyObservableCollection<'a, T> {
    inner: &'a ObservableCollection<T>,
}

impl<'a, T: 'static> ReadonlyObservableCollection<'a, T> {
    /// The viewed collection's `CollectionChanging` event.
    #[must_use]
    pub fn collection_changing(&self) -> &'a CollectionEvent<T, CollectionChangingArgs> {
        self.inner.collection_changing()
    }

    /// The viewed collection's `CollectionChanged` event.
    #[must_use]
    pub fn collection_changed(&self) -> &'a CollectionEvent<T, CollectionChangedArgs> {
        self.inner.collection_changed()
    }

    /// The viewed collection's `PropertyChanging` event.
    #[must_use]
    pub fn property_changing(
        &self,
    ) -> &'a SenderEvent<ObservableCollection<T>, PropertyChangingArgs> {
        self.inner.observable().property_changing()
    }

    /// The viewed collection's `PropertyChanged` event.
    #[must_use]
    pub fn property_changed(
        &self,
    ) -> &'a SenderEvent<ObservableCollection<T>, PropertyChangedArgs> {
        self.inner.observable().property_changed()
    }
}

impl<'a, T> ReadonlyObservableCollection<'a, T> {
    #[must_use]
    pub fn count(&self) -> usize {
        self.inner.count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&'a T> {
        self.inner.get(index)
    }

    #[must_use]
    pub fn first(&self) -> Option<&'a T> {
        self.inner.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&'a T> {
        self.inner.last()
    }

    pub fn iter(&self) -> slice::Iter<'a, T> {
        self.inner.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &'a [T] {
        self.inner.as_slice()
    }

    #[must_use]
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.inner.contains(value)
    }
}

impl<T> Clone for ReadonlyObservableCollection<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ReadonlyObservableCollection<'_, T> {}

impl<'a, T: 'static> From<&'a ObservableCollection<T>> for ReadonlyObservableCollection<'a, T> {
    fn from(inner: &'a ObservableCollection<T>) -> Self {
        inner.as_readonly()
    }
}

impl<T> Index<usize> for ReadonlyObservableCollection<'_, T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.inner[index]
    }
}

impl<'a, T> IntoIterator for ReadonlyObservableCollection<'a, T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for ReadonlyObservableCollection<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReadonlyObservableCollection")
            .field(&self.inner.as_slice())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
