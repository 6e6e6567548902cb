//! `AtomicInteger`: a sequentially consistent 64-bit signed integer cell.

use core::fmt;

use crossbeam_utils::Backoff;
use portable_atomic::AtomicI64;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::lock_free::{self, CellKind, LockFreePolicy};
use crate::error::{Error, Result};

const ORDER: core::sync::atomic::Ordering = core::sync::atomic::Ordering::SeqCst;

/// A signed 64-bit integer supporting lock-free atomic operations.
///
/// Every operation is `SeqCst`; there is no way to request a weaker ordering.
/// Arithmetic wraps on overflow, exactly like the underlying instruction.
#[repr(transparent)]
pub struct AtomicInteger {
    value: AtomicI64,
}

/// Generates a `get_and_<op>` / `<op>_and_get` pair on top of a `fetch_*` method.
macro_rules! fetch_ops {
    ($($(#[$doc:meta])* $fetch:ident => $get_and:ident, $and_get:ident, |$prev:ident, $x:ident| $apply:expr;)*) => {
        $(
            $(#[$doc])*
            /// Returns the value before the update.
            #[inline(always)]
            pub fn $get_and(&self, x: i64) -> i64 {
                self.value.$fetch(x, ORDER)
            }

            $(#[$doc])*
            /// Returns the value after the update.
            #[inline(always)]
            pub fn $and_get(&self, x: i64) -> i64 {
                let $prev = self.value.$fetch(x, ORDER);
                let $x = x;
                $apply
            }
        )*
    };
}

impl AtomicInteger {
    /// Creates a new cell holding `value`.
    ///
    /// Logs a warning (once per process) if 64-bit atomics are not lock free on
    /// this CPU; the cell still works.
    pub fn new(value: i64) -> Self {
        lock_free::warn_unless_lock_free(CellKind::Integer);
        Self {
            value: AtomicI64::new(value),
        }
    }

    /// Creates a new cell, applying `policy` if the platform is not lock free.
    ///
    /// # Errors
    /// [`Error::NotLockFree`] under [`LockFreePolicy::Deny`] on a platform
    /// without lock-free 64-bit atomics.
    pub fn with_policy(value: i64, policy: LockFreePolicy) -> Result<Self> {
        policy.check(CellKind::Integer)?;
        Ok(Self {
            value: AtomicI64::new(value),
        })
    }

    /// Creates a new cell from any integer, rejecting values outside `i64`.
    ///
    /// # Errors
    /// [`Error::OutOfRange`] if `value` does not fit.
    pub fn try_new<V>(value: V) -> Result<Self>
    where
        V: TryInto<i64> + Copy + fmt::Display,
    {
        narrow(value).map(Self::new)
    }

    /// Atomically loads the current value.
    #[inline(always)]
    pub fn get(&self) -> i64 {
        self.value.load(ORDER)
    }

    /// Atomically stores `x`.
    #[inline(always)]
    pub fn set(&self, x: i64) {
        self.value.store(x, ORDER);
    }

    /// Stores any integer, rejecting values outside `i64` without touching the cell.
    ///
    /// # Errors
    /// [`Error::OutOfRange`] if `x` does not fit.
    pub fn try_set<V>(&self, x: V) -> Result<()>
    where
        V: TryInto<i64> + Copy + fmt::Display,
    {
        let x = narrow(x)?;
        self.set(x);
        Ok(())
    }

    /// Atomically stores `x`, returning the previous value.
    #[inline(always)]
    pub fn get_and_set(&self, x: i64) -> i64 {
        self.value.swap(x, ORDER)
    }

    /// Stores `update` if the current value equals `expect`.
    ///
    /// Returns whether the store happened. Never fails spuriously.
    #[inline(always)]
    pub fn compare_and_set(&self, expect: i64, update: i64) -> bool {
        self.value
            .compare_exchange(expect, update, ORDER, ORDER)
            .is_ok()
    }

    /// Like [`compare_and_set`](Self::compare_and_set) but may fail spuriously.
    ///
    /// A `false` result does not imply the value differed from `expect`, so
    /// callers retry in a loop. A `true` result always means the store happened.
    #[inline(always)]
    pub fn weak_compare_and_set(&self, expect: i64, update: i64) -> bool {
        self.value
            .compare_exchange_weak(expect, update, ORDER, ORDER)
            .is_ok()
    }

    fetch_ops! {
        /// Atomically adds `x` (wrapping).
        fetch_add => get_and_add, add_and_get, |prev, x| prev.wrapping_add(x);
        /// Atomically subtracts `x` (wrapping).
        fetch_sub => get_and_sub, sub_and_get, |prev, x| prev.wrapping_sub(x);
        /// Atomically applies bitwise AND with `x`.
        fetch_and => get_and_and, and_and_get, |prev, x| prev & x;
        /// Atomically applies bitwise XOR with `x`.
        fetch_xor => get_and_xor, xor_and_get, |prev, x| prev ^ x;
        /// Atomically applies bitwise OR with `x`.
        fetch_or => get_and_or, or_and_get, |prev, x| prev | x;
        /// Atomically applies bitwise NAND with `x`: `!(value & x)`.
        fetch_nand => get_and_nand, nand_and_get, |prev, x| !(prev & x);
    }

    /// Atomically replaces the value with `f(value)`, returning the old value.
    ///
    /// `f` may run several times under contention.
    pub fn get_and_update<F>(&self, mut f: F) -> i64
    where
        F: FnMut(i64) -> i64,
    {
        let backoff = Backoff::new();
        let mut current = self.get();
        loop {
            let next = f(current);
            match self.value.compare_exchange_weak(current, next, ORDER, ORDER) {
                Ok(prev) => return prev,
                Err(actual) => {
                    current = actual;
                    backoff.spin();
                }
            }
        }
    }

    /// Atomically replaces the value with `f(value)`, returning the new value.
    ///
    /// `f` may run several times under contention.
    pub fn update_and_get<F>(&self, mut f: F) -> i64
    where
        F: FnMut(i64) -> i64,
    {
        let backoff = Backoff::new();
        let mut current = self.get();
        loop {
            let next = f(current);
            match self.value.compare_exchange_weak(current, next, ORDER, ORDER) {
                Ok(_) => return next,
                Err(actual) => {
                    current = actual;
                    backoff.spin();
                }
            }
        }
    }

    /// Returns a mutable reference to the value; no atomics needed with `&mut`.
    #[inline]
    pub fn get_mut(&mut self) -> &mut i64 {
        self.value.get_mut()
    }

    /// Consumes the cell and returns the value.
    #[inline]
    pub fn into_inner(self) -> i64 {
        self.value.into_inner()
    }
}

fn narrow<V>(value: V) -> Result<i64>
where
    V: TryInto<i64> + Copy + fmt::Display,
{
    value.try_into().map_err(|_| Error::OutOfRange {
        value: value.to_string(),
    })
}

impl Default for AtomicInteger {
    fn default() -> Self {
        Self::new(0)
    }
}

impl From<i64> for AtomicInteger {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

macro_rules! try_from_wide {
    ($($ty:ty),*) => {
        $(
            impl TryFrom<$ty> for AtomicInteger {
                type Error = Error;

                fn try_from(value: $ty) -> Result<Self> {
                    Self::try_new(value)
                }
            }
        )*
    };
}

try_from_wide!(u64, usize, i128, u128);

impl fmt::Debug for AtomicInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AtomicInteger({})", self.get())
    }
}

impl fmt::Display for AtomicInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.get(), f)
    }
}

impl Serialize for AtomicInteger {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.get())
    }
}

impl<'de> Deserialize<'de> for AtomicInteger {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        i64::deserialize(deserializer).map(Self::new)
    }
}
