//! Domain layer for Wayline
//!
//! Contains the trip model, the polyline codec and the route normalizer.
//! Everything here is pure and synchronous; I/O lives in outer layers.

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use services::{DecodeError, RouteNormalizer};
pub use value_objects::*;
