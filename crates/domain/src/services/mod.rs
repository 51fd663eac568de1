//! Domain services - Pure transformations over trip data

pub mod polyline;
pub mod route_normalizer;

pub use polyline::{DecodeError, decode, encode};
pub use route_normalizer::{
    RouteNormalizer, parse_duration_minutes, path_length_km, round_to_hundredths,
};
