use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/", get(handlers::health))
        .route("/health", get(handlers::health))
        // Catalog
        .route("/search", get(handlers::search))
        .route("/details", get(handlers::details))
        .route("/episodes", get(handlers::episodes))
        // Downloads
        .route("/download", get(handlers::download))
        .route("/extract", get(handlers::download))
        .route("/resolve", get(handlers::resolve))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
