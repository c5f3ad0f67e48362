//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gate and poller produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (call outcome counters, blocking gauge)
//!
//! Consumers:
//!     → stdout/stderr (pretty or JSON lines)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - The gate only emits events on transitions and rejections
//! - Metric updates go through the `metrics` facade and are no-ops until
//!   an exporter is installed

pub mod logging;
pub mod metrics;
