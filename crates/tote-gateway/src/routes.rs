//! HTTP route definitions

use crate::{AppState, handlers, middleware};
use axum::{
    Router,
    routing::{get, post, delete},
    middleware as axum_middleware,
    extract::DefaultBodyLimit,
};
use std::sync::Arc;
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
};

/// Create the main router
pub fn create_router(state: Arc<AppState>) -> Router {
    // All origins are allowed on every route
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any);

    Router::new()
        // Service endpoints
        .route("/health", get(handlers::health_check))

        // Object endpoints
        .route("/upload", post(handlers::upload_object))
        .route("/download/{key}", get(handlers::download_object))
        .route("/list", get(handlers::list_objects))
        .route("/delete/{key}", delete(handlers::delete_object))

        // Apply middleware. The logging layer sits inside the request ID
        // layer so it can read the ID extension.
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(axum_middleware::from_fn(middleware::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(state.config.max_body_size))
        .with_state(state)
}
