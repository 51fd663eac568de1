//! Trip planner port
//!
//! The multimodal trip backend: given two points and a departure time it
//! answers with itinerary options grouped by transport mode.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use domain::{Coordinate, RouteResponse, TransportMode};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Time value meaning "depart now"
pub const TIME_NOW: &str = "timenow";

/// Which modes the backend should search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ModeFilter {
    /// Every mode the backend knows
    #[default]
    All,
    /// A single mode
    Only(TransportMode),
}

impl fmt::Display for ModeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(mode) => write!(f, "{mode}"),
        }
    }
}

impl FromStr for ModeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

impl TryFrom<String> for ModeFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ModeFilter> for String {
    fn from(filter: ModeFilter) -> Self {
        filter.to_string()
    }
}

/// A trip search as sent to the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
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
    /// Departure time, `HH:MM:SS` or [`TIME_NOW`]
    pub time: String,
    /// Date the user originally asked for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_date: Option<String>,
    /// Time the user originally asked for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_time: Option<String>,
    /// Modes to search
    #[serde(default)]
    pub mode: ModeFilter,
}

impl TripRequest {
    /// Request departing now on the given date, all modes
    #[must_use]
    pub fn new(from: Coordinate, to: Coordinate, date: impl Into<String>) -> Self {
        Self {
            from_lat: from.lat,
            from_lon: from.lon,
            to_lat: to.lat,
            to_lon: to.lon,
            date: date.into(),
            time: TIME_NOW.to_string(),
            requested_date: None,
            requested_time: None,
            mode: ModeFilter::All,
        }
    }

    /// Set the departure time
    #[must_use]
    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = time.into();
        self
    }

    /// Restrict the search to one mode
    #[must_use]
    pub const fn with_mode(mut self, mode: ModeFilter) -> Self {
        self.mode = mode;
        self
    }

    /// Origin point
    #[must_use]
    pub const fn origin(&self) -> Coordinate {
        Coordinate::new(self.from_lat, self.from_lon)
    }

    /// Destination point
    #[must_use]
    pub const fn destination(&self) -> Coordinate {
        Coordinate::new(self.to_lat, self.to_lon)
    }

    /// Check that both endpoints are valid coordinates and a date is set
    pub fn validate(&self) -> Result<(), ApplicationError> {
        Coordinate::validated(self.from_lat, self.from_lon)
            .map_err(|e| ApplicationError::InvalidInput(format!("origin: {e}")))?;
        Coordinate::validated(self.to_lat, self.to_lon)
            .map_err(|e| ApplicationError::InvalidInput(format!("destination: {e}")))?;
        if self.date.trim().is_empty() {
            return Err(ApplicationError::InvalidInput("date is required".into()));
        }
        if self.time.trim().is_empty() {
            return Err(ApplicationError::InvalidInput("time is required".into()));
        }
        Ok(())
    }
}

/// Port for the multimodal trip backend
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TripPlannerPort: Send + Sync {
    /// Search itineraries; geometry in the response is encoded at 1e5
    async fn plan_trip(&self, request: &TripRequest) -> Result<RouteResponse, ApplicationError>;

    /// Check if the trip backend is reachable
    async fn is_available(&self) -> bool;
}
