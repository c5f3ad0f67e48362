//! Failure-counting gate around a fallible operation, plus an HTTP polling
//! driver built on it.
//!
//! The [`Gate`] forwards calls to its operation until a run of recognized
//! failures reaches the threshold, then rejects calls locally with
//! [`GateError::Blocked`]. After a fixed number of rejections it lets one
//! call through; a success there closes the gate again.
//!
//! ```no_run
//! use circuit_gate::{Gate, GateError};
//!
//! # async fn demo() {
//! let gate = Gate::new(|n: u32| async move {
//!     if n % 2 == 0 { Ok(n) } else { Err(std::io::Error::other("odd")) }
//! });
//!
//! match gate.execute(4).await {
//!     Ok(v) => println!("got {v}"),
//!     Err(GateError::Blocked) => println!("dependency assumed down"),
//!     Err(e) => println!("call failed: {e}"),
//! }
//! # }
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod poller;
pub mod resilience;

pub use config::AppConfig;
pub use http::{ApiClient, ApiGate, ConnectionFailures};
pub use lifecycle::Shutdown;
pub use poller::Poller;
pub use resilience::{AnyFailure, FailureClassifier, Gate, GateError, GateSnapshot, GateState, Operation};
