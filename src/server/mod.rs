//! Metrics HTTP server
//!
//! A minimal axum application with a single `GET /metrics` route. Binding and
//! serving are split so startup can fail fast on a taken port while the serve
//! loop runs as a background task.

use crate::error::{AppError, Result};
use crate::metrics::{self, MetricsRegistry};
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Bind the metrics listener on all interfaces
pub async fn bind(port: u16) -> Result<TcpListener> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::server_bind(format!("failed to bind {addr}: {e}")))
}

/// Serve `/metrics` on an already-bound listener until the process exits
pub async fn serve(listener: TcpListener, registry: Arc<MetricsRegistry>) -> Result<()> {
    let router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(registry);

    axum::serve(listener, router)
        .await
        .map_err(|e| AppError::server_bind(format!("metrics server error: {e}")))
}

async fn metrics_handler(State(registry): State<Arc<MetricsRegistry>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        metrics::render(&registry),
    )
}
