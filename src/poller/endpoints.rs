//! Resolved API URLs.

use url::{ParseError, Url};

use crate::config::ApiConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub auth: Url,
    pub projects: Url,
    /// Prefix for the token in the `Authorization` header, e.g. `JWT`.
    pub auth_scheme: String,
}

impl Endpoints {
    /// Resolve the configured paths below `base_url`.
    ///
    /// Paths are appended to the base path, as if joined with `/`.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ParseError> {
        let mut base = Url::parse(&config.base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            auth: base.join(config.auth_path.trim_start_matches('/'))?,
            projects: base.join(config.projects_path.trim_start_matches('/'))?,
            auth_scheme: config.auth_scheme.clone(),
        })
    }

    /// Value for the `Authorization` header.
    pub fn authorization(&self, token: &str) -> String {
        format!("{} {}", self.auth_scheme, token)
    }
}
