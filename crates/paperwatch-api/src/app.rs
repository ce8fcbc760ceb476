//! Application state and router assembly.

use std::net::SocketAddr;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use paperwatch_core::Result;
use paperwatch_db::PaperStore;
use paperwatch_jobs::JobRunner;

use crate::handlers;

/// Shared state handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    /// Record store for listings, lookups, and aggregates.
    pub store: PaperStore,
    /// Background runner for triggered fetch cycles; also owns the tracker.
    pub runner: JobRunner,
}

impl AppState {
    pub fn new(store: PaperStore, runner: JobRunner) -> Self {
        Self { store, runner }
    }
}

/// Build the router with all routes, permissive CORS, and request tracing.
///
/// CORS is wide open so the browser frontend can run on any origin during
/// development.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/api/papers", get(handlers::list_papers))
        .route("/api/papers/:id", get(handlers::get_paper))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/categories", get(handlers::get_categories))
        .route("/api/jobs/:id", get(handlers::get_job))
        .route("/api/trigger", post(handlers::trigger_fetch))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind and serve the app until the process is terminated.
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(
        subsystem = "api",
        addr = %addr,
        "paperwatch API listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
