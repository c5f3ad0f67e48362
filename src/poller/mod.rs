//! Polling driver.
//!
//! # Data Flow
//! ```text
//! login/password
//!     → runner.rs authenticate (POST auth URL through the gate)
//!     → token
//!     → runner.rs run loop (GET projects URL through the gate)
//!         success  → print body, pause success_interval
//!         failure  → log, pause failure_interval
//!         blocked  → log, pause blocked_interval
//!     → until shutdown or max_iterations
//! ```
//!
//! # Design Decisions
//! - Login and polling share one gate: both hit the same dependency
//! - Pauses are caller policy and live here, never in the gate

pub mod endpoints;
pub mod error;
pub mod runner;

pub use endpoints::Endpoints;
pub use error::PollerError;
pub use runner::{PollStats, Poller};
