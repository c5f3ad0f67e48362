//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to a dependency:
//!     → gate.rs (blocking check, forced pass-through)
//!     → operation.rs (the wrapped call, e.g. an HTTP request)
//!     → classify.rs (does this failure count?)
//!     → gate.rs (update consecutive failure / blocked counters)
//! ```
//!
//! # Design Decisions
//! - The gate is time-independent: it recovers only through a forced
//!   pass-through after a fixed number of rejected calls
//! - Real failures are always returned to the caller; the gate only adds
//!   a `Blocked` outcome for calls it refuses to make
//! - Waiting and retrying belong to the caller, never to the gate

pub mod classify;
pub mod error;
pub mod gate;
pub mod operation;

pub use classify::{AnyFailure, FailureClassifier};
pub use error::GateError;
pub use gate::{Gate, GateBuilder, GateSnapshot, GateState};
pub use operation::Operation;
