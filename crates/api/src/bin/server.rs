//! Simplicity Unchained proxy server
//!
//! Forwards `/api/proxy/*` requests to the Simplicity service and the
//! signing web proxy.

use anyhow::Result;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use unchained_api::{start_server, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting Simplicity Unchained proxy");

    let config = load_config()?;
    let addr: SocketAddr = config.listen_addr.parse()?;

    info!("Server configuration:");
    info!("  Listen Address: {}", addr);
    info!("  Simplicity Service: {}", config.service_url);
    info!("  Web Proxy: {}", config.web_proxy_url);

    let state = AppState::new(config.service_url, config.web_proxy_url);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(state, addr).await {
            error!("Server error: {}", e);
        }
    });

    info!("Server running. Press Ctrl+C to shutdown.");
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(err) => error!("Unable to listen for shutdown signal: {}", err),
    }

    server_handle.abort();
    info!("Shutdown complete");
    Ok(())
}

#[derive(Debug)]
struct Config {
    listen_addr: String,
    service_url: String,
    web_proxy_url: String,
}

fn load_config() -> Result<Config> {
    let listen_addr = std::env::var("LISTEN_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let service_url = std::env::var("SIMPLICITY_SERVICE_URL")
        .unwrap_or_else(|_| "http://localhost:8080".to_string());

    let web_proxy_url = std::env::var("PROXY_URL")
        .unwrap_or_else(|_| "http://localhost:3001".to_string());

    for (name, url) in [("SIMPLICITY_SERVICE_URL", &service_url), ("PROXY_URL", &web_proxy_url)] {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            anyhow::bail!("{} must be an http(s) URL, got {}", name, url);
        }
    }

    Ok(Config {
        listen_addr,
        service_url,
        web_proxy_url,
    })
}
