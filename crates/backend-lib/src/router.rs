// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP routes.
use crate::handlers;
use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let failure_route = state.settings.login_failure_redirect.clone();

    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/sign-up",
            get(handlers::sign_up_get).post(handlers::sign_up_post),
        )
        .route("/log-in", post(handlers::log_in))
        .route(&failure_route, get(handlers::log_in_failed))
        .route("/log-out", post(handlers::log_out))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
