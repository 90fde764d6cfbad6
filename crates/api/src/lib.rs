//! Simplicity Unchained proxy server
//!
//! Same-origin HTTP surface for browser and CLI clients. Every route under
//! `/api/proxy` forwards its JSON body to either the Simplicity service or
//! the signing web proxy.

pub mod error;
pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tracing::info;
use unchained_types::endpoints::PROXY_BASE_PATH;

pub use error::ApiError;
pub use state::AppState;

/// Build the full router: `/health` plus the forwarding routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest(PROXY_BASE_PATH, routes::proxy::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve until the task is cancelled.
pub async fn start_server(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Proxy listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
