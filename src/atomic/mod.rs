//! Boxed, sequentially consistent atomic cells.
//!
//! Two independent leaf types:
//! - [`AtomicInteger`]: a 64-bit signed integer with load/store/exchange/CAS and
//!   the fetch-and-apply family (`add`, `sub`, `and`, `xor`, `or`, `nand`).
//! - [`AtomicReference`]: an `Option<Arc<T>>` slot with load/store/exchange/CAS,
//!   where ownership claims move in step with the atomic swap.
//!
//! Every operation uses `SeqCst`. Weaker orderings are deliberately not exposed.

/// Integer cell.
pub mod integer;
/// Platform probe and [`LockFreePolicy`].
pub mod lock_free;
/// Reference cell.
pub mod reference;

pub use integer::AtomicInteger;
pub use lock_free::{CellKind, LockFreePolicy};
pub use reference::AtomicReference;
