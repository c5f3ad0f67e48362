//! Decoded API response.

use reqwest::StatusCode;
use serde_json::Value;

/// Status and body of a completed HTTP call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    /// JSON body; a body that is not JSON is kept as a string, an empty
    /// body is `Null`.
    pub body: Value,
}

impl ApiResponse {
    pub fn from_bytes(status: StatusCode, bytes: &[u8]) -> Self {
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
        };
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// A top-level string field of a JSON object body.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.body.get(name).and_then(Value::as_str)
    }

    /// Body rendered for humans.
    pub fn pretty_body(&self) -> String {
        serde_json::to_string_pretty(&self.body).unwrap_or_else(|_| self.body.to_string())
    }
}
