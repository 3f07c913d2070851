// src/main.rs - prusa-proxy entry point
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use prusa_proxy::config::Config;
use prusa_proxy::printer::PrinterClient;
use prusa_proxy::web::api::{AppStateInner, app_with_state};

/// HTTP proxy for pausing, resuming and stopping Prusa printers.
#[derive(Debug, Parser)]
#[command(name = "prusa-proxy", version)]
struct Args {
    /// Configuration file for prusa-proxy.
    #[arg(long, default_value = "./prusa.yml")]
    config: PathBuf,

    /// Port where the proxy listens.
    #[arg(long, default_value_t = 31100)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();

    tracing::info!(
        "Starting prusa-proxy with configuration file: {}",
        args.config.display()
    );
    tracing::info!("Listening on port: {}", args.port);

    if !args.config.exists() {
        tracing::error!("Configuration file does not exist: {}", args.config.display());
        return Err(format!(
            "configuration file does not exist: {}",
            args.config.display()
        )
        .into());
    }

    let config = Config::load(&args.config).map_err(|e| {
        tracing::error!("Failed to load config from '{}': {}", args.config.display(), e);
        Box::new(e) as Box<dyn std::error::Error + Send + Sync + 'static>
    })?;

    tracing::info!(printers = config.printers.len(), "Configuration loaded");

    let state = Arc::new(AppStateInner {
        config,
        client: PrinterClient::new(),
    });
    let app = app_with_state(state);

    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], args.port))).await?;
    tracing::info!("Web API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
