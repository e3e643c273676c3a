//! Charity platform API server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http server ──▶ handlers ──┬──▶ store (SQLite / mock)
//!                     (middleware)               │
//!     Client Response                            └──▶ solana client ──▶ JSON-RPC node
//!     ◀──────────────
//!
//!     Cross-cutting: config, logging, metrics, lifecycle (startup / shutdown)
//! ```
//!
//! Usage: `charity-platform [config.toml]`. Without a path the defaults
//! plus environment overrides are used.

use std::path::PathBuf;

use tokio::net::TcpListener;

use charity_platform::config::{load_config, load_from_env};
use charity_platform::lifecycle::{build_state, spawn_cache_sweeper, spawn_signal_listener, Shutdown};
use charity_platform::observability::{logging::init_logging, metrics::init_metrics};
use charity_platform::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => load_config(&path)?,
        None => load_from_env()?,
    };

    init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.server.bind_address,
        network = %config.solana.network,
        "charity-platform starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let bind_address = config.server.bind_address.clone();
    let state = build_state(config).await?;

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    spawn_signal_listener(shutdown.clone());
    spawn_cache_sweeper(state.balances.clone(), shutdown.clone());

    HttpServer::new(state).run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
