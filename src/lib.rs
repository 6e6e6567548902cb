//! # `sc-atomic` - Boxed Sequentially Consistent Atomics
//!
//! Two thread-safe cells for building lock-free algorithms (counters, flags,
//! Treiber stacks, single-writer publication):
//!
//! - [`AtomicInteger`]: a 64-bit signed integer with load, store, exchange,
//!   strong and weak compare-and-set, and fetch-and-apply arithmetic/bitwise
//!   operations in both `get_and_<op>` and `<op>_and_get` forms.
//! - [`AtomicReference<T>`]: a slot holding `Option<Arc<T>>` with the same
//!   load/store/exchange/CAS family. CAS compares by identity (same
//!   allocation), and `Arc` ownership moves in step with the swap.
//!
//! ## Ordering
//!
//! Every operation is `SeqCst`: a single total order exists over all atomic
//! operations on all cells. No weaker ordering is exposed.
//!
//! ## Progress
//!
//! Nothing blocks. Where the CPU lacks a native atomic of the required width
//! the storage falls back to an internal lock; construction reports that
//! according to [`LockFreePolicy`] (a `tracing` warning by default).
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use sc_atomic::{AtomicInteger, AtomicReference};
//!
//! let n = AtomicInteger::new(10);
//! assert!(n.compare_and_set(10, 20));
//! assert!(!n.compare_and_set(10, 30));
//! assert_eq!(n.get(), 20);
//!
//! let a = Arc::new("a");
//! let b = Arc::new("b");
//! let r = AtomicReference::new(Some(a.clone()));
//! assert!(r.compare_and_set(Some(&a), Some(b.clone())));
//! assert!(Arc::ptr_eq(&r.get().unwrap(), &b));
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod atomic;
pub mod error;

pub use atomic::{AtomicInteger, AtomicReference, CellKind, LockFreePolicy};
pub use error::{Error, Result};

// Compile-time layout checks.
const _: () = {
    use core::mem;

    // `AtomicInteger` is `repr(transparent)` over a single 64-bit atomic.
    assert!(mem::size_of::<AtomicInteger>() == mem::size_of::<i64>());
};
