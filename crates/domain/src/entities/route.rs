//! Normalized route entity

use serde::{Deserialize, Serialize};

use super::trip::{DecodedStep, Segment};
use crate::value_objects::TransportMode;

/// A flattened, client-ready route candidate
///
/// Built fresh for each request from one upstream option. `duration` and
/// `distance` are derived from the steps, never copied from upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// `"<mode>-<ordinal>"`, unique within one normalization run
    pub id: String,
    /// Origin station name
    pub from_station_name: String,
    /// Destination station name
    pub to_station_name: String,
    /// Transport mode of the option
    pub mode: TransportMode,
    /// Total duration in minutes
    pub duration: u32,
    /// Total path length in kilometers, rounded to 2 decimals
    pub distance: f64,
    /// Steps with decoded geometry
    pub steps: Vec<DecodedStep>,
    /// Walking share in meters, as reported upstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub walk_distance: Option<f64>,
    /// Per-mode aggregates, as reported upstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<Segment>>,
}

impl Route {
    /// Total number of geometry points across all steps
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.steps.iter().map(|step| step.geometry.len()).sum()
    }
}

/// Sort routes by ascending duration
///
/// Stable, so routes of equal duration keep their relative order.
pub fn sort_by_duration(routes: &mut [Route]) {
    routes.sort_by_key(|route| route.duration);
}
