//! HTTP surface: a JSON search endpoint over the [`Aggregator`].

mod error;
mod handlers;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::jobs::Aggregator;

pub use error::{ApiError, ApiResult};
pub use handlers::{JobsQuery, JobsResponse, SourceEntry, SourcesResponse};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
}

impl AppState {
    pub fn new(aggregator: Aggregator) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/jobs", get(handlers::search_jobs))
        .route("/api/sources", get(handlers::list_sources))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `addr` and serves the API until the process receives Ctrl+C.
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Job search API listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
        // Without a signal handler, run until the process is killed
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
