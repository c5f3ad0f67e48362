//! Poller errors.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::http::ApiError;
use crate::resilience::GateError;

#[derive(Debug, Error)]
pub enum PollerError {
    /// The login call failed or was blocked.
    #[error(transparent)]
    Gate(#[from] GateError<ApiError>),

    /// The server answered the login with a non-200 status.
    #[error("login failed with status {status}: {body}")]
    Authentication { status: StatusCode, body: Value },

    /// The login succeeded but carried no `token` field.
    #[error("login response has no token: {body}")]
    MissingToken { body: Value },
}
