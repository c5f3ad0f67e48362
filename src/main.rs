//! circuit-gate
//!
//! Logs in to an API, then polls one endpoint forever through a
//! failure-counting gate.
//!
//! ```text
//!   CLI flags ──┐
//!   config.toml ┴─▶ AppConfig ─▶ ApiClient ─▶ Gate ─▶ Poller
//!                                                      │
//!            ┌─────────────────────────────────────────┘
//!            ▼
//!   authenticate (POST) ─▶ token ─▶ poll loop (GET)
//!                                    success  → print, wait 3s
//!                                    failure  → log,   wait 1s
//!                                    blocked  → log,   wait 3s
//! ```

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::path::PathBuf;

use clap::Parser;

use circuit_gate::config::{self, AppConfig, ConfigError, LogFormat};
use circuit_gate::http::{ApiClient, ConnectionFailures};
use circuit_gate::lifecycle::{signals, Shutdown};
use circuit_gate::observability::{logging, metrics};
use circuit_gate::poller::{Endpoints, Poller};
use circuit_gate::Gate;

#[derive(Parser)]
#[command(name = "circuit-gate")]
#[command(about = "Poll an API through a failure-counting gate", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API login
    #[arg(long)]
    login: Option<String>,

    /// API password
    #[arg(long)]
    password: Option<String>,

    /// Base URL of the API, e.g. http://127.0.0.1:8000/v1
    #[arg(long)]
    base_url: Option<String>,

    /// Consecutive connection failures before the gate blocks
    #[arg(long)]
    failure_threshold: Option<NonZeroU32>,

    /// Rejected calls before one call is forced through
    #[arg(long)]
    max_blocked_passes: Option<NonZeroU32>,

    /// Stop after this many polling attempts
    #[arg(long)]
    max_iterations: Option<u64>,

    /// Log output format
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

impl Cli {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(url) = &self.base_url {
            config.api.base_url = url.clone();
        }
        if let Some(threshold) = self.failure_threshold {
            config.gate.failure_threshold = threshold;
        }
        if let Some(passes) = self.max_blocked_passes {
            config.gate.max_blocked_passes = passes;
        }
        if let Some(max) = self.max_iterations {
            config.poll.max_iterations = Some(max);
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => AppConfig::default(),
    };
    cli.apply(&mut config);
    config::validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability)?;
    tracing::info!("circuit-gate v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let endpoints = Endpoints::from_config(&config.api)?;
    let client = ApiClient::from_config(&config.api)?;
    let gate = Gate::builder(client)
        .name("api")
        .classifier(ConnectionFailures)
        .config(&config.gate)
        .build();

    tracing::info!(
        base_url = %config.api.base_url,
        failure_threshold = config.gate.failure_threshold.get(),
        max_blocked_passes = config.gate.max_blocked_passes.get(),
        "Configuration loaded"
    );

    let poller = Poller::new(gate, endpoints, config.poll.clone());

    let shutdown = Shutdown::new();
    let mut login_stop = shutdown.subscribe();
    let stop = shutdown.subscribe();
    signals::spawn_ctrl_c(shutdown.clone());

    let login = tokio::select! {
        biased;
        _ = login_stop.recv() => {
            tracing::info!("Interrupted during login");
            return Ok(());
        }
        login = poller.authenticate(cli.login.as_deref(), cli.password.as_deref()) => login,
    };
    drop(login_stop);

    let token = match login {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(error = %e, "Login failed");
            return Err(e.into());
        }
    };

    let stats = poller.run(&token, stop).await;

    tracing::info!(
        successes = stats.successes,
        failures = stats.failures,
        blocked = stats.blocked,
        "Shutdown complete"
    );
    Ok(())
}
