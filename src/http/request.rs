//! Outbound request description.

use reqwest::Method;
use serde_json::Value;
use url::Url;

/// Everything needed to make one HTTP call.
#[derive(Debug, Clone)]
pub struct HttpCall {
    pub method: Method,
    pub url: Url,
    /// Sent as a JSON body when present.
    pub json: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl HttpCall {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            json: None,
            headers: Vec::new(),
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: Url, body: Value) -> Self {
        Self::new(Method::POST, url).json(body)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}
