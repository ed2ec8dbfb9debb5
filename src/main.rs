//! netdiag service.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌────────────────────────────────────────────────┐
//!     API request       │  ┌────────┐    ┌──────────┐                     │
//!     ──────────────────┼─▶│  http  │───▶│ handlers │                     │
//!                       │  │ server │    └────┬─────┘                     │
//!                       │  └────────┘         │                           │
//!                       │        ┌────────────┼──────────────┐            │
//!                       │        ▼            ▼              ▼            │
//!                       │  ┌──────────┐  ┌─────────┐  ┌─────────────┐     │
//!                       │  │ capacity │─▶│  load   │  │ diagnostics │     │
//!                       │  │  search  │  │ driver  │  │ cmd / dns   │     │
//!                       │  └──────────┘  └────┬────┘  └──────┬──────┘     │
//!                       │                     │              │            │
//!                       └─────────────────────┼──────────────┼────────────┘
//!                                             ▼              ▼
//!                                       target endpoint   nmap / ping /
//!                                                         traceroute / DNS
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use netdiag::config::{load_config, ServiceConfig};
use netdiag::http::{AppState, HttpServer};
use netdiag::lifecycle::{signals, Shutdown};
use netdiag::observability::{init_logging, metrics};

#[derive(Parser)]
#[command(name = "netdiag")]
#[command(about = "Network diagnostics and HTTP capacity testing service", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "NETDIAG_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    init_logging(&config.observability);
    tracing::info!("netdiag v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_in_flight = config.load.max_in_flight,
        default_levels = ?config.capacity.default_levels,
        diagnostics_enabled = config.diagnostics.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    let state = AppState::from_config(&config, shutdown.clone())?;
    let server = HttpServer::new(&config, state);

    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::trigger_on_signal(&trigger).await;
    });

    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
