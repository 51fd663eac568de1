//! Road routing handler

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use domain::Coordinate;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{error::ApiError, state::AppState};

/// Two points to connect by road
#[derive(Debug, Deserialize)]
pub struct RoadRouteRequest {
    pub origin: Coordinate,
    pub destination: Coordinate,
}

/// Decoded road geometry
#[derive(Debug, Serialize, Deserialize)]
pub struct RoadRouteResponse {
    pub coordinates: Vec<Coordinate>,
}

/// Road route between two points
///
/// POST /api/route
#[instrument(skip(state, body))]
pub async fn road_route(
    State(state): State<AppState>,
    body: Result<Json<RoadRouteRequest>, JsonRejection>,
) -> Result<Json<RoadRouteResponse>, ApiError> {
    let Json(request) = body?;

    let coordinates = state
        .trip_service
        .road_route(request.origin, request.destination)
        .await?;

    debug!(points = coordinates.len(), "Road route served");
    Ok(Json(RoadRouteResponse { coordinates }))
}
