//! Outbound HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! HttpCall (method, url, json body, headers)
//!     → client.rs (reqwest send with request timeout)
//!     → response.rs (status + decoded JSON body)
//!     → error.rs (transport failures, split by kind)
//! ```
//!
//! # Design Decisions
//! - Non-2xx statuses are responses, not errors; the caller reads status
//! - Only connection-level failures are treated as a dependency being down
//! - `ApiClient` implements `Operation<HttpCall>` so it can sit behind a gate

pub mod client;
pub mod error;
pub mod request;
pub mod response;

pub use client::{ApiClient, ApiGate, ConnectionFailures};
pub use error::ApiError;
pub use request::HttpCall;
pub use response::ApiResponse;
