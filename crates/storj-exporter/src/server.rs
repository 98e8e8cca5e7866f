//! HTTP scrape endpoint
//!
//! Every `GET /metrics` runs a fresh collection pass. Collectors block on
//! upstream HTTP calls, so the gather runs on tokio's blocking pool. Upstream
//! failures only shrink the metric set; the response is still a 200.

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use prometheus::{Encoder, Registry, TextEncoder};
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::constants;

/// Router exposing the registry at the metrics path
pub fn router(registry: Registry) -> Router {
    Router::new()
        .route(constants::METRICS_PATH, get(handle_metrics))
        .with_state(registry)
}

/// Serve until `shutdown` completes
pub async fn serve(
    listen: SocketAddr,
    registry: Registry,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let listener = TcpListener::bind(listen)
        .await
        .with_context(|| format!("Failed to bind scrape server to {}", listen))?;

    info!(
        "Starting Storj Node Exporter on http://{}{}",
        listen,
        constants::METRICS_PATH
    );

    axum::serve(listener, router(registry))
        .with_graceful_shutdown(shutdown)
        .await
        .context("Scrape server failed")?;

    info!("Scrape server stopped");
    Ok(())
}

async fn handle_metrics(State(registry): State<Registry>) -> Response {
    let families = match tokio::task::spawn_blocking(move || registry.gather()).await {
        Ok(families) => families,
        Err(e) => {
            error!(error = %e, "Collection pass did not complete");
            Vec::new()
        }
    };

    debug!(families = families.len(), "Collection pass finished");

    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&families, &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return (StatusCode::INTERNAL_SERVER_ERROR, "failed to encode metrics").into_response();
    }

    ([(header::CONTENT_TYPE, encoder.format_type().to_string())], buffer).into_response()
}
