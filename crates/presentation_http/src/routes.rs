//! Route definitions

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{handlers, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Location catalog
        .route("/countries", get(handlers::catalog::list_countries))
        .route(
            "/countries/{country}/cities",
            get(handlers::catalog::list_cities),
        )
        // Live aggregation subscription
        .route("/ws", get(handlers::ws::subscribe))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
