//! Outbound HTTP errors.

use std::error::Error as StdError;
use std::io;

use thiserror::Error;

/// Errors from [`ApiClient`](super::ApiClient).
#[derive(Debug, Error)]
pub enum ApiError {
    /// Could not reach the server, or the server dropped the connection
    /// before answering (refused, DNS, connect timeout, reset, closed
    /// mid-request).
    #[error("connection failed: {0}")]
    Connect(#[source] reqwest::Error),

    /// Connected, but the request did not finish in time.
    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    /// Any other transport or protocol failure.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// A header name or value could not be encoded.
    #[error("invalid header '{name}'")]
    InvalidHeader { name: String },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

impl ApiError {
    /// Sort a reqwest error by kind.
    ///
    /// Connect timeouts count as connection failures, read timeouts do not.
    pub fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_connect() {
            ApiError::Connect(error)
        } else if error.is_timeout() {
            ApiError::Timeout(error)
        } else if connection_dropped(&error) {
            ApiError::Connect(error)
        } else {
            ApiError::Transport(error)
        }
    }

    /// True for failures meaning the server could not be reached at all.
    pub fn is_connection(&self) -> bool {
        matches!(self, ApiError::Connect(_))
    }
}

/// Walk the source chain looking for a connection the peer closed or reset
/// before a response arrived.
fn connection_dropped(error: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(err) = current {
        if let Some(hyper_err) = err.downcast_ref::<hyper::Error>() {
            if hyper_err.is_incomplete_message() {
                return true;
            }
        }
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            if matches!(
                io_err.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
                    | io::ErrorKind::UnexpectedEof
            ) {
                return true;
            }
        }
        current = err.source();
    }
    false
}
