//! Value Objects - Immutable, identity-less domain primitives

mod coordinate;
mod precision;
mod transport_mode;

pub use coordinate::{Coordinate, EARTH_RADIUS_KM, InvalidCoordinates};
pub use precision::Precision;
pub use transport_mode::TransportMode;
