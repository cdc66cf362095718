use std::sync::Arc;

use axum::http::Method;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::server::handlers::{root, sim};
use crate::state::AppState;

/// Creates the application router: the greeting page, a health probe, and
/// the sim endpoint, behind permissive read-only CORS and request tracing.
pub fn router(state: Arc<AppState>) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .route("/", get(root::index))
        .route("/health", get(root::health))
        .route("/api/sim/simv3", get(sim::simv3))
        .with_state(state)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
}
