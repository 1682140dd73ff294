//! HTTP server for the mirror service.
//!
//! Provides endpoints for:
//! - Mirroring an image (`/<image>`, streamed plain text)
//! - Health check (`/health`)

use std::sync::Arc;

use axum::{http::header, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

mod handlers;
pub mod responses;

/// Create the HTTP router.
pub fn create_router(state: Arc<AppState>) -> Router {
    // Browser-based terminals read the stream cross-origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/", get(handlers::mirror_image))
        .route("/*image", get(handlers::mirror_image))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
