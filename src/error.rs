//! Error type shared by both cells.

use thiserror::Error;

/// Errors reported at the construction/conversion boundary.
///
/// No variant is ever produced by an operation on an existing cell: once a
/// cell is built, every operation either completes or (for CAS) reports
/// `false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The platform has no lock-free atomics of the width `kind` needs and the
    /// caller asked for [`LockFreePolicy::Deny`](crate::LockFreePolicy::Deny).
    #[error("{kind} is not lock free on this platform")]
    NotLockFree {
        /// Name of the cell type that was being constructed.
        kind: &'static str,
    },

    /// An integer did not fit the signed 64-bit range of [`AtomicInteger`](crate::AtomicInteger).
    #[error("{value} is out of range for a 64-bit signed atomic integer")]
    OutOfRange {
        /// The rejected value, rendered in decimal.
        value: String,
    },
}

/// Result alias with [`Error`] as the default error type.
pub type Result<T, E = Error> = core::result::Result<T, E>;
