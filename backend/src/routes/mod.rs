//! Route definitions for the FishSpot API

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::cron_auth_middleware, AppState};

/// Public API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Spot scores
        .route("/spots/:spot_id/score", get(handlers::get_spot_score))
        // Activity index preview
        .route("/activity", post(handlers::preview_activity))
}

/// Scheduled job triggers (bearer secret)
pub fn cron_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/compute-alerts", post(handlers::compute_alerts))
        .route_layer(middleware::from_fn_with_state(state, cron_auth_middleware))
}
