//! `AtomicReference<T>`: a sequentially consistent cell holding an `Option<Arc<T>>`.
//!
//! Ownership claims are `Arc` strong counts. The cell owns exactly one claim on
//! whatever it currently holds:
//!
//! - `get` hands out a *new* claim (an `Arc` clone),
//! - `set`/`compare_and_set` consume the caller's claim on the new value and
//!   release the cell's claim on the old one once the swap has completed,
//! - `get_and_set` transfers the cell's old claim to the caller unchanged.
//!
//! The load-then-increment race that makes a naive `AtomicPtr` + manual
//! refcount unsound is handled by `arc_swap`: a value swapped out of the cell
//! is not released until every reader that loaded it has taken its own claim.

use core::fmt;
use core::ptr;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use crossbeam_utils::Backoff;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::lock_free::{self, CellKind, LockFreePolicy};
use crate::error::Result;

/// A cell holding one shared reference (or none) with atomic load, store,
/// exchange and compare-and-set.
///
/// Compare-and-set compares by *identity*: two `Arc`s match only if they point
/// at the same allocation, and `None` matches only `None`. The payload itself
/// is not protected by the cell; only the pointer to it is atomic.
pub struct AtomicReference<T> {
    inner: ArcSwapOption<T>,
}

#[inline]
fn as_ptr<T>(value: Option<&Arc<T>>) -> *const T {
    value.map_or(ptr::null(), Arc::as_ptr)
}

impl<T> AtomicReference<T> {
    /// Creates a new cell holding `value`, taking over the caller's claim on it.
    ///
    /// Logs a warning (once per process) if pointer-sized atomics are not lock
    /// free on this CPU; the cell still works.
    pub fn new(value: Option<Arc<T>>) -> Self {
        lock_free::warn_unless_lock_free(CellKind::Reference);
        Self {
            inner: ArcSwapOption::new(value),
        }
    }

    /// Creates an empty cell.
    pub fn empty() -> Self {
        Self::new(None)
    }

    /// Creates a new cell, applying `policy` if the platform is not lock free.
    ///
    /// # Errors
    /// [`Error::NotLockFree`](crate::Error::NotLockFree) under
    /// [`LockFreePolicy::Deny`] on a platform without lock-free pointer atomics.
    pub fn with_policy(value: Option<Arc<T>>, policy: LockFreePolicy) -> Result<Self> {
        policy.check(CellKind::Reference)?;
        Ok(Self {
            inner: ArcSwapOption::new(value),
        })
    }

    /// Atomically loads the held reference, returning a new claim on it.
    #[inline]
    pub fn get(&self) -> Option<Arc<T>> {
        self.inner.load_full()
    }

    /// Atomically replaces the held reference with `value`.
    ///
    /// The previous reference's claim is released after the swap.
    #[inline]
    pub fn set(&self, value: Option<Arc<T>>) {
        self.inner.store(value);
    }

    /// Atomically replaces the held reference, returning the previous one.
    ///
    /// The returned `Arc` *is* the cell's former claim; nothing is released.
    #[inline]
    pub fn get_and_set(&self, value: Option<Arc<T>>) -> Option<Arc<T>> {
        self.inner.swap(value)
    }

    /// Installs `update` if the cell currently holds the same allocation as
    /// `expect` (or both are `None`).
    ///
    /// On success the old claim is released; on failure `update` is dropped
    /// and the cell is untouched. Never fails spuriously.
    pub fn compare_and_set(&self, expect: Option<&Arc<T>>, update: Option<Arc<T>>) -> bool {
        let expected = as_ptr(expect);
        let previous = self.inner.compare_and_swap(expected, update);
        ptr::eq(as_ptr((*previous).as_ref()), expected)
    }

    /// Weak form of [`compare_and_set`](Self::compare_and_set).
    ///
    /// Callers must treat `false` as "retry", not as proof of a mismatch. A
    /// `true` result always means `update` was installed.
    ///
    /// The swappable handle only offers a strong exchange, so this currently
    /// never fails spuriously; that is within the weak contract.
    #[inline]
    pub fn weak_compare_and_set(&self, expect: Option<&Arc<T>>, update: Option<Arc<T>>) -> bool {
        self.compare_and_set(expect, update)
    }

    /// Atomically replaces the held reference with `f(current)`, returning the
    /// previous reference.
    ///
    /// `f` may run several times under contention.
    pub fn get_and_update<F>(&self, mut f: F) -> Option<Arc<T>>
    where
        F: FnMut(Option<&Arc<T>>) -> Option<Arc<T>>,
    {
        let backoff = Backoff::new();
        loop {
            let current = self.get();
            let next = f(current.as_ref());
            if self.weak_compare_and_set(current.as_ref(), next) {
                return current;
            }
            backoff.spin();
        }
    }

    /// Atomically replaces the held reference with `f(current)`, returning the
    /// newly installed reference.
    ///
    /// `f` may run several times under contention.
    pub fn update_and_get<F>(&self, mut f: F) -> Option<Arc<T>>
    where
        F: FnMut(Option<&Arc<T>>) -> Option<Arc<T>>,
    {
        let backoff = Backoff::new();
        loop {
            let current = self.get();
            let next = f(current.as_ref());
            if self.weak_compare_and_set(current.as_ref(), next.clone()) {
                return next;
            }
            backoff.spin();
        }
    }

    /// Snapshot test for the empty sentinel.
    #[inline]
    pub fn is_none(&self) -> bool {
        self.inner.load().is_none()
    }

    /// Atomically detaches the held reference, leaving the cell empty.
    ///
    /// This is how a reference cycle running through cells is broken: `Arc`
    /// has no cycle collector, so a cell that (transitively) holds itself
    /// must be cleared explicitly.
    pub fn clear(&self) -> Option<Arc<T>> {
        let detached = self.inner.swap(None);
        tracing::trace!(detached = detached.is_some(), "cleared atomic reference");
        detached
    }

    /// Calls `visit` with the currently held reference, read with an atomic
    /// load so the walk never sees a torn pointer.
    ///
    /// Intended for graph walkers that need to discover edges formed through
    /// cells (e.g. leak or cycle detection). The reference is only borrowed
    /// for the duration of `visit`.
    pub fn traverse<F, R>(&self, visit: F) -> R
    where
        F: FnOnce(Option<&Arc<T>>) -> R,
    {
        let guard = self.inner.load();
        visit((*guard).as_ref())
    }

    /// Consumes the cell and returns the held reference with its claim.
    pub fn into_inner(self) -> Option<Arc<T>> {
        self.inner.into_inner()
    }
}

impl<T> Default for AtomicReference<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> From<Arc<T>> for AtomicReference<T> {
    fn from(value: Arc<T>) -> Self {
        Self::new(Some(value))
    }
}

impl<T> From<Option<Arc<T>>> for AtomicReference<T> {
    fn from(value: Option<Arc<T>>) -> Self {
        Self::new(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for AtomicReference<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.inner.load();
        match (*guard).as_ref() {
            Some(value) => write!(f, "AtomicReference({:?})", &**value),
            None => f.write_str("AtomicReference(None)"),
        }
    }
}

impl<T: Serialize> Serialize for AtomicReference<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let guard = self.inner.load();
        (*guard).as_deref().serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for AtomicReference<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(|value| Self::new(value.map(Arc::new)))
    }
}
