use assistant_relay::{bind_relay, HttpBackend, RelayConfig};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("assistant_relay=info,warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = RelayConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    let backend = Arc::new(HttpBackend::new(&config)?);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl-C, shutting down.");
    };
    let (addr, server) = bind_relay(&config, backend, shutdown).map_err(|e| {
        error!("Failed to bind {}: {}", config.bind_addr, e);
        e
    })?;

    info!(
        "Starting {} {} on http://{} (backend {})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        addr,
        config.api_url
    );
    server.await;

    Ok(())
}
