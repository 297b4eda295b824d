//! # Tourney HTTP Module
//!
//! This module implements the web server using axum.
//!
//! ## Endpoints
//!
//! - `GET /` - HTML index page listing events
//! - `GET /health` - Health check
//! - anything else - embedded static assets (`/style.css`, ...) or 404
//!
//! The server is read-only and unauthenticated; it is meant to be run on
//! the local machine or a trusted network during an event.

mod assets;
mod handlers;
mod pages;
mod types;

// Re-export handlers and types for integration tests (via `tourney::api::*`)
pub use handlers::{asset_handler, health_handler, index_handler};
pub use pages::{EventRow, IndexTemplate};
pub use types::HealthResponse;

use axum::{Router, routing::get};
use std::sync::Arc;
use tokio::sync::Mutex;
use tourney_core::{SqliteStore, TourneyError};
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the store.
///
/// SQLite connections are not `Sync`, so access is serialized.
#[derive(Clone)]
pub struct AppState {
    /// The tournament store.
    pub store: Arc<Mutex<SqliteStore>>,
}

impl AppState {
    /// Create new app state around a store.
    #[must_use]
    pub fn new(store: SqliteStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/health", get(handlers::health_handler))
        .fallback(handlers::asset_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server and run until Ctrl+C.
pub async fn run_server(addr: &str, store: SqliteStore) -> Result<(), TourneyError> {
    let state = AppState::new(store);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| TourneyError::Io(format!("Bind failed: {}", e)))?;

    tracing::info!("Tourney HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| TourneyError::Io(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down HTTP server");
}
