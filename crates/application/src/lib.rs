//! Application layer - Use cases and orchestration
//!
//! Contains the trip planning use cases and the port definitions the
//! infrastructure adapters implement.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
