//! Failure classification.
//!
//! # Responsibilities
//! - Decide which failures of the wrapped operation count toward blocking
//!
//! # Design Decisions
//! - Classification looks at the failure kind, not its content
//! - Failures that are not recognized still reach the caller, uncounted

/// Predicate selecting the failures a gate counts.
pub trait FailureClassifier<E: ?Sized>: Send + Sync {
    /// Return true if `error` should count as a consecutive failure.
    fn is_recognized(&self, error: &E) -> bool;
}

/// Counts every failure. The default classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnyFailure;

impl<E: ?Sized> FailureClassifier<E> for AnyFailure {
    fn is_recognized(&self, _error: &E) -> bool {
        true
    }
}

impl<E: ?Sized, F> FailureClassifier<E> for F
where
    F: Fn(&E) -> bool + Send + Sync,
{
    fn is_recognized(&self, error: &E) -> bool {
        (self)(error)
    }
}
