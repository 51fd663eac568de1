//! Route definitions

use axum::{
    Router,
    routing::{get, post},
};

use crate::{handlers, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Trip planning
        .route("/api/plan-trip", post(handlers::trips::plan_trip))
        // Point-to-point road geometry
        .route("/api/route", post(handlers::routing::road_route))
        // Nominatim proxy
        .route("/api/nominatim/search", get(handlers::geocoding::search))
        .route("/api/nominatim/reverse", get(handlers::geocoding::reverse))
        // Attach state
        .with_state(state)
}
