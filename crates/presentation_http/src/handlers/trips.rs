//! Trip planning handlers

use application::ports::TripRequest;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use domain::Route;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{error::ApiError, state::AppState};

/// Trip search body: the backend request plus the fallback switch
#[derive(Debug, Deserialize)]
pub struct PlanTripBody {
    #[serde(flatten)]
    pub request: TripRequest,
    /// Retry with later departures while nothing is found
    #[serde(default)]
    pub fallback: bool,
}

/// Normalized routes, shortest first
#[derive(Debug, Serialize, Deserialize)]
pub struct PlanTripResponse {
    pub routes: Vec<Route>,
}

/// Plan a trip
///
/// POST /api/plan-trip
#[instrument(skip(state, body))]
pub async fn plan_trip(
    State(state): State<AppState>,
    body: Result<Json<PlanTripBody>, JsonRejection>,
) -> Result<Json<PlanTripResponse>, ApiError> {
    let Json(PlanTripBody { request, fallback }) = body?;

    let routes = if fallback {
        state.trip_service.plan_with_fallback(&request).await?
    } else {
        state.trip_service.plan(&request).await?
    };

    info!(
        routes = routes.len(),
        mode = %request.mode,
        fallback,
        "Trip planned"
    );
    Ok(Json(PlanTripResponse { routes }))
}
