//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod geocoding_port;
mod road_routing_port;
mod trip_planner_port;

#[cfg(test)]
pub use geocoding_port::MockGeocodingPort;
pub use geocoding_port::{DEFAULT_SEARCH_LIMIT, GeocodingPort, Place};
#[cfg(test)]
pub use road_routing_port::MockRoadRoutingPort;
pub use road_routing_port::RoadRoutingPort;
#[cfg(test)]
pub use trip_planner_port::MockTripPlannerPort;
pub use trip_planner_port::{ModeFilter, TIME_NOW, TripPlannerPort, TripRequest};
