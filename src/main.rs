//! Response adapter gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ axum router ──▶ handler ──▶ ServiceResult ──▶ adapter ──▶ AxumSink ──▶ Client
//!                                 │                            ▲
//!                                 └──▶ upstream (reqwest) ─────┘
//!                                      ForwardedResponse
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use response_adapter::config::{load_config, with_bind_address, GatewayConfig};
use response_adapter::http::HttpServer;
use response_adapter::lifecycle::{signals, Shutdown};
use response_adapter::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "response-adapter")]
#[command(about = "Gateway that writes service results as JSON HTTP responses", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config = with_bind_address(config, bind)?;
    }

    logging::init_tracing(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?cli.config,
        "response-adapter starting"
    );
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        request_timeout_secs = config.limits.request_timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
