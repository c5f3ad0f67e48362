//! Login and polling loop driven through a gate.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde_json::json;
use tokio::sync::broadcast;

use crate::config::PollConfig;
use crate::http::{ApiGate, ApiResponse, HttpCall};
use crate::poller::endpoints::Endpoints;
use crate::poller::error::PollerError;
use crate::resilience::GateError;

/// Outcome counts of one polling run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub successes: u64,
    /// Calls that reached the operation and failed.
    pub failures: u64,
    /// Calls the gate refused.
    pub blocked: u64,
}

impl PollStats {
    pub fn attempts(&self) -> u64 {
        self.successes + self.failures + self.blocked
    }
}

/// Drives repeated calls to the API through one gate.
pub struct Poller {
    gate: ApiGate,
    endpoints: Endpoints,
    poll: PollConfig,
}

impl Poller {
    pub fn new(gate: ApiGate, endpoints: Endpoints, poll: PollConfig) -> Self {
        Self {
            gate,
            endpoints,
            poll,
        }
    }

    pub fn gate(&self) -> &ApiGate {
        &self.gate
    }

    /// Log in and return the session token.
    pub async fn authenticate(
        &self,
        login: Option<&str>,
        password: Option<&str>,
    ) -> Result<String, PollerError> {
        let call = HttpCall::post(
            self.endpoints.auth.clone(),
            json!({ "login": login, "password": password }),
        );

        let response = self.gate.execute(call).await?;
        if response.status != StatusCode::OK {
            return Err(PollerError::Authentication {
                status: response.status,
                body: response.body,
            });
        }

        match response.str_field("token") {
            Some(token) => {
                tracing::info!(url = %self.endpoints.auth, "Authenticated");
                Ok(token.to_string())
            }
            None => Err(PollerError::MissingToken {
                body: response.body,
            }),
        }
    }

    /// Poll the projects endpoint until shutdown or `max_iterations`.
    ///
    /// Any message on `shutdown`, or the channel closing, ends the loop at
    /// once. An in-flight request is abandoned and not counted.
    pub async fn run(&self, token: &str, mut shutdown: broadcast::Receiver<()>) -> PollStats {
        let call = HttpCall::get(self.endpoints.projects.clone())
            .header(AUTHORIZATION.as_str(), self.endpoints.authorization(token));
        let mut stats = PollStats::default();

        loop {
            let outcome = tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    tracing::info!("Poll loop stopping");
                    break;
                }
                outcome = self.gate.execute(call.clone()) => outcome,
            };

            let pause = match outcome {
                Ok(response) => {
                    stats.successes += 1;
                    report_success(&response);
                    self.poll.success_interval_ms
                }
                Err(GateError::Blocked) => {
                    stats.blocked += 1;
                    tracing::warn!(gate = %self.gate.name(), "Gate is blocking. No external call made");
                    self.poll.blocked_interval_ms
                }
                Err(e) => {
                    stats.failures += 1;
                    tracing::warn!(error = %e, recognized = matches!(e, GateError::Recognized(_)), "Request failed");
                    self.poll.failure_interval_ms
                }
            };

            if let Some(max) = self.poll.max_iterations {
                if stats.attempts() >= max {
                    tracing::info!(attempts = stats.attempts(), "Reached iteration limit");
                    break;
                }
            }

            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    tracing::info!("Poll loop stopping");
                    break;
                }
                _ = tokio::time::sleep(Duration::from_millis(pause)) => {}
            }
        }

        stats
    }
}

fn report_success(response: &ApiResponse) {
    tracing::info!(status = response.status.as_u16(), "Request made successfully");
    println!(
        "Request made successfully, status={}, content:\n{}",
        response.status.as_u16(),
        response.pretty_body()
    );
}
