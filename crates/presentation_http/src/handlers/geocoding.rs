//! Nominatim proxy handlers
//!
//! Thin pass-through to the geocoding port. Successful answers are marked
//! cacheable for shared caches.

use application::ports::{DEFAULT_SEARCH_LIMIT, Place};
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::header,
    response::IntoResponse,
};
use domain::Coordinate;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{error::ApiError, state::AppState};

/// Cache policy for geocoding responses
pub const GEOCODING_CACHE_CONTROL: &str = "public, s-maxage=3600, stale-while-revalidate=86400";

/// Upper bound Nominatim accepts for `limit`
const MAX_SEARCH_LIMIT: u8 = 40;

/// Query string of `/api/nominatim/search`
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<String>,
}

/// Query string of `/api/nominatim/reverse`
#[derive(Debug, Deserialize)]
pub struct ReverseParams {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

fn cacheable<T: serde::Serialize>(body: T) -> impl IntoResponse {
    ([(header::CACHE_CONTROL, GEOCODING_CACHE_CONTROL)], Json(body))
}

fn parse_limit(limit: Option<&str>) -> Result<u8, ApiError> {
    match limit.map(str::trim).filter(|l| !l.is_empty()) {
        None => Ok(DEFAULT_SEARCH_LIMIT),
        Some(raw) => raw
            .parse::<u8>()
            .ok()
            .filter(|&n| n > 0)
            .map(|n| n.min(MAX_SEARCH_LIMIT))
            .ok_or_else(|| ApiError::BadRequest(format!("Invalid limit value: {raw}"))),
    }
}

fn parse_coordinate(lat: Option<&str>, lon: Option<&str>) -> Result<Coordinate, ApiError> {
    let (Some(lat), Some(lon)) = (
        lat.filter(|v| !v.is_empty()),
        lon.filter(|v| !v.is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "Latitude and longitude parameters are required".to_string(),
        ));
    };

    let invalid = || ApiError::BadRequest("Invalid latitude or longitude values".to_string());
    let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let lon: f64 = lon.trim().parse().map_err(|_| invalid())?;

    Coordinate::validated(lat, lon).map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// Forward geocoding
///
/// GET /api/nominatim/search?q=...&limit=...
#[instrument(skip(state, params))]
pub async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params?;

    let query = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Query parameter is required".to_string()))?;
    let limit = parse_limit(params.limit.as_deref())?;

    let places: Vec<Place> = state.geocoding.search(query, limit).await?;
    debug!(count = places.len(), "Search results served");

    Ok(cacheable(places))
}

/// Reverse geocoding
///
/// GET /api/nominatim/reverse?lat=...&lon=...
#[instrument(skip(state, params))]
pub async fn reverse(
    State(state): State<AppState>,
    params: Result<Query<ReverseParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params?;
    let coordinate = parse_coordinate(params.lat.as_deref(), params.lon.as_deref())?;

    let place = state.geocoding.reverse(coordinate).await?;
    Ok(cacheable(place))
}
