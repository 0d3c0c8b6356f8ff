//! HTTP surface of the screener.

pub mod routes;

use crate::errors::Result;
use crate::services::gainer_service::GainerService;
use axum::routing::get;
use axum::Router;
use log::info;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub fn build_router(service: Arc<GainerService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/get_gainers", get(routes::get_gainers))
        .route("/health", get(routes::health))
        .layer(cors)
        .with_state(service)
}

/// Serve until the listener fails or Ctrl-C is received
pub async fn serve(listener: TcpListener, service: Arc<GainerService>) -> Result<()> {
    info!("Screener listening on {}", listener.local_addr()?);

    axum::serve(listener, build_router(service))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
