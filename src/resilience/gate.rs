//! Failure-counting gate around a fallible operation.
//!
//! # States
//! - Closed: calls are forwarded to the operation
//! - Blocking: calls are rejected locally with [`GateError::Blocked`]
//!
//! # State Transitions
//! ```text
//! Closed → Blocking: failure_count >= failure_threshold (inclusive)
//! Blocking → Closed: a forwarded call succeeds
//! Blocking → Blocking: every (max_blocked_passes + 1)-th rejected attempt
//!                      is forwarded anyway; a failure there keeps blocking
//! ```
//!
//! # Design Decisions
//! - No timers: recovery is driven by attempted calls, not elapsed time
//! - No half-open state: the forced pass-through runs under full blocking
//!   state and is judged by the ordinary success/failure path
//! - The whole check → invoke → update sequence is one critical section

use std::fmt;
use std::num::NonZeroU32;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::GateConfig;
use crate::observability::metrics::{self, CallOutcome};
use crate::resilience::classify::{AnyFailure, FailureClassifier};
use crate::resilience::error::GateError;
use crate::resilience::operation::Operation;

/// `NonZeroU32` from a literal, checked at compile time in const context.
pub(crate) const fn non_zero(n: u32) -> NonZeroU32 {
    match NonZeroU32::new(n) {
        Some(n) => n,
        None => panic!("value must be non-zero"),
    }
}

/// Consecutive recognized failures before blocking, when not configured.
pub const DEFAULT_FAILURE_THRESHOLD: NonZeroU32 = non_zero(3);

/// Rejected calls before a forced pass-through, when not configured.
pub const DEFAULT_MAX_BLOCKED_PASSES: NonZeroU32 = non_zero(5);

const DEFAULT_NAME: &str = "gate";

/// Whether the gate currently forwards calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Closed,
    Blocking,
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateState::Closed => f.write_str("closed"),
            GateState::Blocking => f.write_str("blocking"),
        }
    }
}

/// Point-in-time view of a gate's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateSnapshot {
    pub state: GateState,
    pub failure_count: u32,
    pub blocked_count: u32,
    pub failure_threshold: NonZeroU32,
    pub max_blocked_passes: NonZeroU32,
}

/// What the blocking check decided for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Admission {
    Forward,
    ForcedPass,
    Reject,
}

/// Counters and transition rules, free of any I/O.
#[derive(Debug)]
struct Counters {
    failure_threshold: NonZeroU32,
    max_blocked_passes: NonZeroU32,
    failure_count: u32,
    blocked_count: u32,
}

impl Counters {
    fn new(failure_threshold: NonZeroU32, max_blocked_passes: NonZeroU32) -> Self {
        Self {
            failure_threshold,
            max_blocked_passes,
            failure_count: 0,
            blocked_count: 0,
        }
    }

    fn is_blocking(&self) -> bool {
        self.failure_count > 0 && self.failure_count >= self.failure_threshold.get()
    }

    fn admit(&mut self) -> Admission {
        if !self.is_blocking() {
            return Admission::Forward;
        }

        self.blocked_count = self.blocked_count.saturating_add(1);
        if self.blocked_count <= self.max_blocked_passes.get() {
            Admission::Reject
        } else {
            // Budget spent: re-arm and let this one call through.
            // failure_count stays as is.
            self.blocked_count = 0;
            Admission::ForcedPass
        }
    }

    /// Returns true if this success ended a blocking period.
    fn record_success(&mut self) -> bool {
        let was_blocking = self.is_blocking();
        self.failure_count = 0;
        self.blocked_count = 0;
        was_blocking
    }

    /// Returns true if this failure started a blocking period.
    fn record_failure(&mut self) -> bool {
        let was_blocking = self.is_blocking();
        self.failure_count = self.failure_count.saturating_add(1);
        !was_blocking && self.is_blocking()
    }

    fn snapshot(&self) -> GateSnapshot {
        GateSnapshot {
            state: if self.is_blocking() {
                GateState::Blocking
            } else {
                GateState::Closed
            },
            failure_count: self.failure_count,
            blocked_count: self.blocked_count,
            failure_threshold: self.failure_threshold,
            max_blocked_passes: self.max_blocked_passes,
        }
    }
}

/// A gate owning one operation and the failure state for it.
///
/// Create it once per operation and keep it for as long as the operation is
/// used; the counters live only in memory.
pub struct Gate<Op, C = AnyFailure> {
    name: String,
    operation: Op,
    classifier: C,
    counters: Mutex<Counters>,
}

impl<Op> Gate<Op, AnyFailure> {
    /// Wrap `operation` with default thresholds, counting every failure.
    pub fn new(operation: Op) -> Self {
        Self::builder(operation).build()
    }

    /// Wrap `operation` with thresholds taken from configuration.
    pub fn from_config(operation: Op, config: &GateConfig) -> Self {
        Self::builder(operation).config(config).build()
    }

    /// Start configuring a gate for `operation`.
    pub fn builder(operation: Op) -> GateBuilder<Op, AnyFailure> {
        GateBuilder {
            name: DEFAULT_NAME.to_string(),
            operation,
            classifier: AnyFailure,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            max_blocked_passes: DEFAULT_MAX_BLOCKED_PASSES,
        }
    }
}

impl<Op, C> Gate<Op, C> {
    /// Name used in logs and metric labels.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The wrapped operation.
    pub fn operation(&self) -> &Op {
        &self.operation
    }

    /// Current state. Waits for any in-flight call to finish.
    pub async fn state(&self) -> GateState {
        self.counters.lock().await.snapshot().state
    }

    /// Current counters. Waits for any in-flight call to finish.
    pub async fn snapshot(&self) -> GateSnapshot {
        self.counters.lock().await.snapshot()
    }

    /// Invoke the operation unless the gate is blocking.
    ///
    /// Returns the operation's value on success, the operation's own error
    /// (as `Recognized` or `Unrecognized`) on failure, or
    /// [`GateError::Blocked`] when the call was refused.
    pub async fn execute<Args>(
        &self,
        args: Args,
    ) -> Result<Op::Output, GateError<Op::Error>>
    where
        Op: Operation<Args>,
        C: FailureClassifier<Op::Error>,
    {
        let mut counters = self.counters.lock().await;

        match counters.admit() {
            Admission::Forward => {}
            Admission::Reject => {
                debug!(
                    gate = %self.name,
                    blocked_count = counters.blocked_count,
                    max_blocked_passes = counters.max_blocked_passes.get(),
                    "Gate blocking, call rejected"
                );
                metrics::record_gate_call(&self.name, CallOutcome::Blocked);
                return Err(GateError::Blocked);
            }
            Admission::ForcedPass => {
                info!(
                    gate = %self.name,
                    failure_count = counters.failure_count,
                    "Blocked-pass budget spent, forwarding one call"
                );
                metrics::record_forced_pass(&self.name);
            }
        }

        match self.operation.call(args).await {
            Ok(value) => {
                if counters.record_success() {
                    info!(gate = %self.name, "Gate closed after successful call");
                    metrics::set_gate_blocking(&self.name, false);
                }
                metrics::record_gate_call(&self.name, CallOutcome::Success);
                Ok(value)
            }
            Err(error) if self.classifier.is_recognized(&error) => {
                if counters.record_failure() {
                    warn!(
                        gate = %self.name,
                        failures = counters.failure_count,
                        threshold = counters.failure_threshold.get(),
                        "Gate started blocking"
                    );
                    metrics::set_gate_blocking(&self.name, true);
                }
                metrics::record_gate_call(&self.name, CallOutcome::RecognizedFailure);
                Err(GateError::Recognized(error))
            }
            Err(error) => {
                metrics::record_gate_call(&self.name, CallOutcome::UnrecognizedFailure);
                Err(GateError::Unrecognized(error))
            }
        }
    }
}

impl<Op, C> fmt::Debug for Gate<Op, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gate")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Gate`].
pub struct GateBuilder<Op, C> {
    name: String,
    operation: Op,
    classifier: C,
    failure_threshold: NonZeroU32,
    max_blocked_passes: NonZeroU32,
}

impl<Op, C> GateBuilder<Op, C> {
    /// Name used in logs and metric labels.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Choose which failures count toward blocking.
    pub fn classifier<C2>(self, classifier: C2) -> GateBuilder<Op, C2> {
        GateBuilder {
            name: self.name,
            operation: self.operation,
            classifier,
            failure_threshold: self.failure_threshold,
            max_blocked_passes: self.max_blocked_passes,
        }
    }

    pub fn failure_threshold(mut self, threshold: NonZeroU32) -> Self {
        self.failure_threshold = threshold;
        self
    }

    pub fn max_blocked_passes(mut self, passes: NonZeroU32) -> Self {
        self.max_blocked_passes = passes;
        self
    }

    /// Take both thresholds from configuration.
    pub fn config(self, config: &GateConfig) -> Self {
        self.failure_threshold(config.failure_threshold)
            .max_blocked_passes(config.max_blocked_passes)
    }

    pub fn build(self) -> Gate<Op, C> {
        Gate {
            name: self.name,
            operation: self.operation,
            classifier: self.classifier,
            counters: Mutex::new(Counters::new(self.failure_threshold, self.max_blocked_passes)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn nz(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_counters_threshold_is_inclusive() {
        let mut c = Counters::new(nz(2), nz(1));
        assert_eq!(c.admit(), Admission::Forward);
        assert!(!c.record_failure());
        assert_eq!(c.admit(), Admission::Forward);
        assert!(c.record_failure());
        assert!(c.is_blocking());
        assert_eq!(c.admit(), Admission::Reject);
    }

    #[test]
    fn test_counters_forced_pass_rearms_without_touching_failures() {
        let mut c = Counters::new(nz(1), nz(2));
        c.record_failure();

        assert_eq!(c.admit(), Admission::Reject);
        assert_eq!(c.admit(), Admission::Reject);
        assert_eq!(c.admit(), Admission::ForcedPass);
        assert_eq!(c.blocked_count, 0);
        assert_eq!(c.failure_count, 1);
        assert!(c.is_blocking());
    }

    #[test]
    fn test_counters_success_resets_everything() {
        let mut c = Counters::new(nz(1), nz(3));
        c.record_failure();
        c.admit();
        assert_eq!(c.blocked_count, 1);

        assert!(c.record_success());
        assert_eq!(c.failure_count, 0);
        assert_eq!(c.blocked_count, 0);
        assert_eq!(c.snapshot().state, GateState::Closed);
    }

    #[test]
    fn test_counters_repeated_failures_while_blocking_are_not_new_trips() {
        let mut c = Counters::new(nz(1), nz(1));
        assert!(c.record_failure());
        assert!(!c.record_failure());
        assert_eq!(c.failure_count, 2);
    }

    #[tokio::test]
    async fn test_default_thresholds() {
        let gate = Gate::new(|_: ()| async { Ok::<_, String>(()) });
        let snap = gate.snapshot().await;
        assert_eq!(snap.failure_threshold, DEFAULT_FAILURE_THRESHOLD);
        assert_eq!(snap.max_blocked_passes, DEFAULT_MAX_BLOCKED_PASSES);
        assert_eq!(snap.failure_threshold.get(), 3);
        assert_eq!(snap.max_blocked_passes.get(), 5);
        assert_eq!(gate.name(), "gate");
    }

    #[tokio::test]
    async fn test_from_config() {
        let config = GateConfig {
            failure_threshold: nz(4),
            max_blocked_passes: nz(3),
        };
        let gate = Gate::from_config(|_: ()| async { Ok::<_, String>(()) }, &config);
        let snap = gate.snapshot().await;
        assert_eq!(snap.failure_threshold.get(), 4);
        assert_eq!(snap.max_blocked_passes.get(), 3);
    }

    #[tokio::test]
    async fn test_blocked_call_does_not_invoke_operation() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let gate = Gate::builder(move |_: ()| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>("down".to_string()) }
        })
        .failure_threshold(nz(1))
        .build();

        assert!(matches!(gate.execute(()).await, Err(GateError::Recognized(_))));
        assert!(matches!(gate.execute(()).await, Err(GateError::Blocked)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(gate.state().await, GateState::Blocking);
    }
}
