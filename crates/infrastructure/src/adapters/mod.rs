//! Adapters implementing application ports over the upstream clients

mod geocoding_adapter;
mod road_routing_adapter;
mod trip_planner_adapter;

use application::ApplicationError;
use integration_transit::UpstreamError;

pub use geocoding_adapter::GeocodingAdapter;
pub use road_routing_adapter::RoadRoutingAdapter;
pub use trip_planner_adapter::TripPlannerAdapter;

/// Map an upstream failure onto the application taxonomy
///
/// `service` names the upstream in the message; internals such as URLs
/// stay in the logs.
pub(crate) fn map_upstream_error(service: &str, err: UpstreamError) -> ApplicationError {
    match err {
        UpstreamError::RateLimited { .. } => ApplicationError::RateLimited,
        UpstreamError::NotFound(what) => ApplicationError::NotFound(what),
        UpstreamError::NoRoute => ApplicationError::NotFound(format!("{service}: no route")),
        UpstreamError::Configuration(msg) => ApplicationError::Configuration(msg),
        UpstreamError::ConnectionFailed(_)
        | UpstreamError::Timeout { .. }
        | UpstreamError::Status { .. }
        | UpstreamError::Parse(_) => {
            ApplicationError::ExternalService(format!("{service} request failed: {err}"))
        },
    }
}
