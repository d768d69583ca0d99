//! API gateway access layer.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ request id ─▶ trace ─▶ timing ─▶ CORS ─▶ timeout ─┐
//!                                                               ▼
//!                                              authentication (JWT)
//!                                                               ▼
//!                           path firewall, access policy (first match wins)
//!                                       │ allow        │ 401 / 403
//!                                       ▼              ▼
//!                                   upstream        rejection
//!                                       │
//!   Client ◀─────────── timing on_exit logs elapsed time ◀┘
//! ```

use std::net::SocketAddr;

use tokio::net::TcpListener;

use gateway_guard::config::load_from_env;
use gateway_guard::http::GatewayServer;
use gateway_guard::lifecycle::{signals, Shutdown};
use gateway_guard::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration before logging so the configured level applies;
    // a bad config is reported on stderr and stops the process.
    let (config, source) = match load_from_env() {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("gateway-guard: configuration error: {}", e);
            std::process::exit(1);
        }
    };

    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        source = %source,
        bind_address = %config.listener.bind_address,
        rules = config.rules.len(),
        request_timeout_secs = config.timeouts.request_secs,
        cors_enabled = config.cors.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let server = GatewayServer::new(config)?;

    // Bind TCP listener
    let listener = TcpListener::bind(&server.config().listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(&shutdown);

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
