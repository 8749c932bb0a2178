//! API Routes
//!
//! Configures the Axum router with all gateway endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, delete_many_handler, delete_pattern_handler, get_handler, get_many_handler,
    health_handler, set_handler, set_many_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /cache/:key` - Store a value (`nx` for set-if-absent)
/// - `GET /cache/:key` - Retrieve a value
/// - `DELETE /cache/:key` - Delete a key
/// - `POST /batch/set` - Store many values
/// - `POST /batch/get` - Retrieve many values
/// - `POST /batch/delete` - Delete many keys
/// - `POST /pattern/delete` - Delete keys matching a glob
/// - `GET /stats` - In-memory statistics
/// - `GET /health` - Health check endpoint
///
/// Single-key endpoints take an optional `?version=` override.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/cache/:key",
            put(set_handler).get(get_handler).delete(delete_handler),
        )
        .route("/batch/set", post(set_many_handler))
        .route("/batch/get", post(get_many_handler))
        .route("/batch/delete", post(delete_many_handler))
        .route("/pattern/delete", post(delete_pattern_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
