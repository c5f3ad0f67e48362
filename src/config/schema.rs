//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the poller.
//! All types derive Serde traits for deserialization from config files.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::resilience::gate::non_zero;

/// Failure threshold for the API gate when the config file omits it.
pub const DEFAULT_API_FAILURE_THRESHOLD: NonZeroU32 = non_zero(4);

/// Blocked-pass budget for the API gate when the config file omits it.
pub const DEFAULT_API_MAX_BLOCKED_PASSES: NonZeroU32 = non_zero(3);

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Thresholds for the gate around the API call.
    pub gate: GateConfig,

    /// Where the API lives.
    pub api: ApiConfig,

    /// Pauses between polling attempts.
    pub poll: PollConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// Gate thresholds.
///
/// Zero is rejected while parsing, so a loaded config always holds usable
/// values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GateConfig {
    /// Consecutive connection failures before the gate starts blocking.
    pub failure_threshold: NonZeroU32,

    /// Rejected calls before one call is forced through.
    pub max_blocked_passes: NonZeroU32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            failure_threshold: DEFAULT_API_FAILURE_THRESHOLD,
            max_blocked_passes: DEFAULT_API_MAX_BLOCKED_PASSES,
        }
    }
}

/// API endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL all paths are resolved against.
    pub base_url: String,

    /// Path of the login endpoint, relative to `base_url`.
    pub auth_path: String,

    /// Path of the polled endpoint, relative to `base_url`.
    pub projects_path: String,

    /// Scheme placed before the token in the `Authorization` header.
    pub auth_scheme: String,

    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/v1".to_string(),
            auth_path: "authenticate".to_string(),
            projects_path: "projects/".to_string(),
            auth_scheme: "JWT".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Polling loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollConfig {
    /// Pause after a successful call, in milliseconds.
    pub success_interval_ms: u64,

    /// Pause after a failed call, in milliseconds.
    pub failure_interval_ms: u64,

    /// Pause after the gate rejected a call, in milliseconds.
    pub blocked_interval_ms: u64,

    /// Stop after this many attempts. Runs until interrupted when unset.
    pub max_iterations: Option<u64>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            success_interval_ms: 3000,
            failure_interval_ms: 1000,
            blocked_interval_ms: 3000,
            max_iterations: None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level or filter directive (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
