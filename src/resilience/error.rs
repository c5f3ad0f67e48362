//! Outcomes a gate reports instead of a value.

use thiserror::Error;

/// Error returned by [`Gate::execute`](super::Gate::execute).
///
/// `Recognized` and `Unrecognized` carry the wrapped operation's own error
/// untouched; only `Blocked` is produced by the gate.
#[derive(Debug, Error)]
pub enum GateError<E> {
    /// The gate is blocking and did not invoke the operation.
    #[error("gate is blocking; no call made")]
    Blocked,

    /// The operation failed with an error the gate counted.
    #[error(transparent)]
    Recognized(E),

    /// The operation failed with an error the gate ignores.
    #[error(transparent)]
    Unrecognized(E),
}

impl<E> GateError<E> {
    /// True if the call was rejected without reaching the operation.
    pub fn is_blocked(&self) -> bool {
        matches!(self, GateError::Blocked)
    }

    /// The operation's own error, if the operation was invoked.
    pub fn into_inner(self) -> Option<E> {
        match self {
            GateError::Blocked => None,
            GateError::Recognized(e) | GateError::Unrecognized(e) => Some(e),
        }
    }

    /// Borrow the operation's own error, if any.
    pub fn inner(&self) -> Option<&E> {
        match self {
            GateError::Blocked => None,
            GateError::Recognized(e) | GateError::Unrecognized(e) => Some(e),
        }
    }
}
