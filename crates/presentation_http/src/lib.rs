//! Wayline HTTP presentation layer
//!
//! axum API over the trip planning service and the geocoding proxy.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, set_expose_internal_errors};
pub use routes::create_router;
pub use state::AppState;
