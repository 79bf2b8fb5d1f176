use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Reference data
        .route("/platforms", get(handlers::get_platforms))
        .route("/countries", get(handlers::get_countries))
        // Search
        .route("/search", post(handlers::run_search))
        .route("/search/stream", get(handlers::stream_search))
        .route("/search/cancel", post(handlers::cancel_search))
}
