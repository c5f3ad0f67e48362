//! HTTP client for the polled API.
//!
//! # Responsibilities
//! - Send an `HttpCall` and decode the response
//! - Enforce the configured request timeout
//! - Classify transport failures for the gate

use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;

use crate::config::ApiConfig;
use crate::http::error::ApiError;
use crate::http::request::HttpCall;
use crate::http::response::ApiResponse;
use crate::resilience::{FailureClassifier, Gate, Operation};

/// A gate around [`ApiClient`] counting only connection failures.
pub type ApiGate = Gate<ApiClient, ConnectionFailures>;

/// Counts connection-level failures only. Timeouts after connecting,
/// protocol errors and bad headers pass through uncounted.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectionFailures;

impl FailureClassifier<ApiError> for ConnectionFailures {
    fn is_recognized(&self, error: &ApiError) -> bool {
        error.is_connection()
    }
}

/// Thin wrapper over a reqwest client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    /// Create a client whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Build)?;
        Ok(Self { client })
    }

    /// Use an already configured reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(Duration::from_secs(config.request_timeout_secs))
    }

    /// Perform one request. Any received status is returned as a response.
    pub async fn send(&self, call: HttpCall) -> Result<ApiResponse, ApiError> {
        let headers = build_headers(&call.headers)?;

        let mut request = self
            .client
            .request(call.method.clone(), call.url.clone())
            .headers(headers);
        if let Some(body) = &call.json {
            request = request.json(body);
        }

        tracing::trace!(method = %call.method, url = %call.url, "Sending request");

        let response = request.send().await.map_err(ApiError::from_reqwest)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(ApiError::from_reqwest)?;

        tracing::debug!(url = %call.url, status = status.as_u16(), "Response received");
        Ok(ApiResponse::from_bytes(status, &bytes))
    }
}

impl Operation<HttpCall> for ApiClient {
    type Output = ApiResponse;
    type Error = ApiError;

    fn call(&self, call: HttpCall) -> impl Future<Output = Result<ApiResponse, ApiError>> + Send {
        self.send(call)
    }
}

fn build_headers(pairs: &[(String, String)]) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::with_capacity(pairs.len());
    for (name, value) in pairs {
        let invalid = || ApiError::InvalidHeader { name: name.clone() };
        let name_h = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let value_h = HeaderValue::from_str(value).map_err(|_| invalid())?;
        headers.append(name_h, value_h);
    }
    Ok(headers)
}
