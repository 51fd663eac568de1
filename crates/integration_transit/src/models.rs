//! Wire models for the upstream services

use serde::{Deserialize, Serialize};

/// Trip search body accepted by the trip backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanTripRequest {
    /// Origin latitude
    #[serde(rename = "fromLat")]
    pub from_lat: f64,
    /// Origin longitude
    #[serde(rename = "fromLon")]
    pub from_lon: f64,
    /// Destination latitude
    #[serde(rename = "toLat")]
    pub to_lat: f64,
    /// Destination longitude
    #[serde(rename = "toLon")]
    pub to_lon: f64,
    /// Travel date, `YYYY-MM-DD`
    pub date: String,
    /// Departure time, `HH:MM:SS` or "timenow"
    pub time: String,
    /// Date the user originally asked for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_date: Option<String>,
    /// Time the user originally asked for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_time: Option<String>,
    /// Mode key or "all"
    pub mode: String,
}

/// Point in a Valhalla request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValhallaLocation {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
}

/// Body of a Valhalla `/route` request
#[derive(Debug, Clone, Serialize)]
pub struct ValhallaRouteRequest {
    /// Origin first, destination last
    pub locations: Vec<ValhallaLocation>,
    /// Costing model
    pub costing: String,
    /// Narrative options
    pub directions_options: DirectionsOptions,
}

/// Valhalla directions options
#[derive(Debug, Clone, Serialize)]
pub struct DirectionsOptions {
    /// Distance units
    pub units: String,
}

/// Valhalla `/route` response, reduced to what is consumed
#[derive(Debug, Clone, Deserialize)]
pub struct ValhallaRouteResponse {
    /// Computed trip
    pub trip: ValhallaTrip,
}

/// Trip section of a Valhalla response
#[derive(Debug, Clone, Deserialize)]
pub struct ValhallaTrip {
    /// One leg per pair of consecutive locations
    #[serde(default)]
    pub legs: Vec<ValhallaLeg>,
    /// Totals over all legs
    #[serde(default)]
    pub summary: Option<ValhallaSummary>,
}

/// A single Valhalla leg
#[derive(Debug, Clone, Deserialize)]
pub struct ValhallaLeg {
    /// Polyline at 1e6 precision
    pub shape: String,
}

/// Valhalla trip summary
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ValhallaSummary {
    /// Length in the requested units
    #[serde(default)]
    pub length: f64,
    /// Duration in seconds
    #[serde(default)]
    pub time: f64,
}
