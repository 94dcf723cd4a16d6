use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Whole-body limit for multipart uploads (several photos of up to 10 MB each)
pub const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .nest("/api", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Routes under /api
fn api_routes() -> Router<AppState> {
    Router::new()
        // Product recommendations
        .route("/recommendations", post(handlers::recommend))
        .route("/fashion-search", post(handlers::recommend))
        // Structured style recommendation
        .route("/style", post(handlers::style))
        .route("/style/image", post(handlers::style_image))
        // Direct search
        .route("/search", post(handlers::search))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
