//! Geocoding port
//!
//! Forward search (free text to places) and reverse lookup (point to place).

use async_trait::async_trait;
use domain::Coordinate;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Default number of search results
pub const DEFAULT_SEARCH_LIMIT: u8 = 5;

/// A geocoded place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Human-readable address
    pub display_name: String,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Feature class, e.g. "amenity"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Feature type, e.g. "bus_stop"
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub place_type: Option<String>,
    /// Relevance score from the geocoder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<f64>,
}

impl Place {
    /// Location of this place
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

/// Port for geocoding
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Places matching a free-text query, best match first
    async fn search(&self, query: &str, limit: u8) -> Result<Vec<Place>, ApplicationError>;

    /// Place at a coordinate
    async fn reverse(&self, coordinate: Coordinate) -> Result<Place, ApplicationError>;
}
