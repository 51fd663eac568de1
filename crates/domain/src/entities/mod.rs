//! Entities - Trip payloads and the normalized routes built from them

mod route;
mod trip;

pub use route::{Route, sort_by_duration};
pub use trip::{DecodedStep, Geometry, OptionsMap, RouteResponse, Segment, Step, TripOption};
