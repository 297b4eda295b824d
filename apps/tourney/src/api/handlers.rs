//! # HTTP Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{AppState, assets, pages::IndexTemplate, types::HealthResponse};
use askama::Template;
use axum::{
    Json,
    extract::State,
    http::{StatusCode, Uri, header},
    response::{Html, IntoResponse, Response},
};

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// INDEX HANDLER
// =============================================================================

/// Render the index page with every event.
pub async fn index_handler(State(state): State<AppState>) -> Response {
    let summaries = {
        let store = state.store.lock().await;
        store.list_event_summaries()
    };

    let summaries = match summaries {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Index: cannot list events: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h1>Internal Server Error</h1>".to_string()),
            )
                .into_response();
        }
    };

    match IndexTemplate::new(&summaries).render() {
        Ok(html) => (StatusCode::OK, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Index: template error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h1>Internal Server Error</h1>".to_string()),
            )
                .into_response()
        }
    }
}

// =============================================================================
// ASSET HANDLER
// =============================================================================

/// Serve an embedded static asset, or 404.
pub async fn asset_handler(uri: Uri) -> Response {
    match assets::lookup(uri.path()) {
        Some((content_type, body)) => {
            ([(header::CONTENT_TYPE, content_type)], body).into_response()
        }
        None => {
            tracing::debug!("No route or asset for {}", uri.path());
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
    }
}
