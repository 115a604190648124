//! Router construction.

use axum::http::StatusCode;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Empty router handed to the service registrar.
pub fn new_router() -> Router {
    Router::new()
}

/// Wrap the registered routes with access logging and a 404 fallback.
///
/// Must run after the registrar: axum layers only cover routes that
/// already exist.
pub fn finish_router(router: Router) -> Router {
    router
        .fallback(|| async { (StatusCode::NOT_FOUND, "No such service") })
        .layer(TraceLayer::new_for_http())
}
