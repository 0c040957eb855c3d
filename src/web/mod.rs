//! Metrics exposition server.
//!
//! Serves the pull-model scrape endpoint: every `GET /metrics` triggers one
//! collection cycle over the configured devices and returns the rendered
//! text exposition. Device failures never surface here; a failed device just
//! means empty families.

pub mod config;

// Re-export commonly used items
pub use config::WebConfig;

use crate::error::{MeterError, Result};
use crate::metrics::{exposition, MeterCollector};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Build the router for the metrics server.
pub fn create_app(collector: MeterCollector) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .with_state(Arc::new(collector))
        .layer(TraceLayer::new_for_http())
}

/// Start the metrics server and block until shutdown.
///
/// An interrupt signal stops the listener after the scrape in flight (if
/// any) has completed; it does not interrupt a running device query.
pub async fn start_web_server(config: WebConfig, collector: MeterCollector) -> Result<()> {
    let app = create_app(collector);

    let addr = config
        .bind_address()
        .parse::<SocketAddr>()
        .map_err(|e| MeterError::config_error(format!("invalid bind address: {}", e)))?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MeterError::web_server_error(format!("failed to bind to address: {}", e)))?;

    info!("Metrics server listening on http://{}", addr);
    info!("Scrape endpoint: http://{}/metrics", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| MeterError::web_server_error(format!("server error: {}", e)))?;

    Ok(())
}

async fn metrics_handler(State(collector): State<Arc<MeterCollector>>) -> Response {
    let families = collector.collect().await;

    match exposition::encode_families(&families) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, exposition::CONTENT_TYPE)],
            body,
        )
            .into_response(),
        Err(err) => {
            error!("Failed to encode metrics: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", err);
        return;
    }
    info!("Shutdown signal received, stopping metrics server");
}
