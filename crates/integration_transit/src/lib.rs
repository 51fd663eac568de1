//! Upstream integrations for Wayline
//!
//! HTTP clients for the three services the trip planner talks to:
//!
//! - the multimodal trip backend ([`HttpTripPlannerClient`]), whose step
//!   geometry is encoded at five decimal digits,
//! - a [Valhalla](https://valhalla1.openstreetmap.de) road router
//!   ([`ValhallaClient`]), whose leg shapes use six digits,
//! - [Nominatim/OpenStreetMap](https://nominatim.openstreetmap.org) geocoding
//!   ([`NominatimGeocodingClient`]).
//!
//! # Architecture
//!
//! Each upstream has a client trait and one reqwest-based implementation.
//! All clients report failures as [`UpstreamError`]; mapping onto
//! application errors happens in the infrastructure adapters.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_transit::{RoadRoutingClient, ValhallaClient, ValhallaConfig, ValhallaLocation};
//!
//! let client = ValhallaClient::new(&ValhallaConfig::default())?;
//! let shapes = client
//!     .route_shapes(
//!         ValhallaLocation { lat: 45.0703, lon: 7.6869 },
//!         ValhallaLocation { lat: 45.0623, lon: 7.6625 },
//!     )
//!     .await?;
//! ```

mod config;
mod error;
mod geocoding;
mod models;
mod trip_planner;
mod valhalla;

pub use config::{TripPlannerConfig, ValhallaConfig};
pub use error::UpstreamError;
pub use geocoding::{GeocodedPlace, GeocodingClient, NominatimConfig, NominatimGeocodingClient};
pub use models::{
    DirectionsOptions, PlanTripRequest, ValhallaLeg, ValhallaLocation, ValhallaRouteRequest,
    ValhallaRouteResponse, ValhallaSummary, ValhallaTrip,
};
pub use trip_planner::{HttpTripPlannerClient, TripPlannerClient};
pub use valhalla::{RoadRoutingClient, ValhallaClient};
