//! Platform lock-freedom probe and the policy applied when it fails.
//!
//! Both cells are always *correct*: when the CPU has no native atomic of the
//! needed width, `portable_atomic` falls back to a lock internally. What is lost
//! is the non-blocking progress guarantee, so constructing a cell on such a
//! platform is reported according to a [`LockFreePolicy`] rather than failing
//! outright.

use std::sync::Once;

use portable_atomic::{AtomicI64, AtomicPtr};

use crate::error::{Error, Result};

/// Whether `AtomicInteger` storage is lock free on every target this build can run on.
pub const INTEGER_ALWAYS_LOCK_FREE: bool = AtomicI64::is_always_lock_free();

/// Whether `AtomicReference` storage is lock free on every target this build can run on.
pub const REFERENCE_ALWAYS_LOCK_FREE: bool = AtomicPtr::<()>::is_always_lock_free();

/// Returns `true` if 64-bit integer atomics are lock free on the running CPU.
#[inline]
pub fn is_integer_lock_free() -> bool {
    AtomicI64::is_lock_free()
}

/// Returns `true` if pointer-sized atomics are lock free on the running CPU.
#[inline]
pub fn is_reference_lock_free() -> bool {
    AtomicPtr::<()>::is_lock_free()
}

/// The two cell kinds that probe the platform at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// [`AtomicInteger`](crate::AtomicInteger).
    Integer,
    /// [`AtomicReference`](crate::AtomicReference).
    Reference,
}

static INTEGER_WARNED: Once = Once::new();
static REFERENCE_WARNED: Once = Once::new();

impl CellKind {
    /// Type name used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            CellKind::Integer => "AtomicInteger",
            CellKind::Reference => "AtomicReference",
        }
    }

    /// Probes the running CPU for this kind's storage width.
    pub fn is_lock_free(self) -> bool {
        match self {
            CellKind::Integer => is_integer_lock_free(),
            CellKind::Reference => is_reference_lock_free(),
        }
    }

    fn warned(self) -> &'static Once {
        match self {
            CellKind::Integer => &INTEGER_WARNED,
            CellKind::Reference => &REFERENCE_WARNED,
        }
    }
}

/// What to do when a cell is built on a platform without lock-free atomics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockFreePolicy {
    /// Build the cell without any diagnostic.
    Silent,
    /// Build the cell and log a `tracing` warning (once per cell kind).
    #[default]
    Warn,
    /// Refuse to build the cell with [`Error::NotLockFree`].
    Deny,
}

impl LockFreePolicy {
    /// Applies this policy to the running platform for `kind`.
    ///
    /// # Errors
    /// Returns [`Error::NotLockFree`] only under [`LockFreePolicy::Deny`] when
    /// the platform lacks lock-free atomics for `kind`.
    pub fn check(self, kind: CellKind) -> Result<()> {
        self.enforce(kind, kind.is_lock_free())
    }

    pub(crate) fn enforce(self, kind: CellKind, lock_free: bool) -> Result<()> {
        if lock_free {
            return Ok(());
        }
        match self {
            LockFreePolicy::Silent => Ok(()),
            LockFreePolicy::Warn => {
                warn_once(kind);
                Ok(())
            }
            LockFreePolicy::Deny => {
                tracing::debug!(kind = kind.name(), "refusing to build a non-lock-free cell");
                Err(Error::NotLockFree { kind: kind.name() })
            }
        }
    }
}

/// Logs the fallback warning for `kind`, at most once per process.
fn warn_once(kind: CellKind) {
    kind.warned().call_once(|| emit_not_lock_free(kind));
}

pub(crate) fn emit_not_lock_free(kind: CellKind) {
    tracing::warn!(
        kind = kind.name(),
        "{} is not lock free; falling back to a locked implementation",
        kind.name()
    );
}

/// Construction path of the infallible constructors.
#[inline]
pub(crate) fn warn_unless_lock_free(kind: CellKind) {
    if !kind.is_lock_free() {
        warn_once(kind);
    }
}
