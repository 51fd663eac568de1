//! Road routing port
//!
//! Point-to-point road geometry, used to draw a single path on the map.

use async_trait::async_trait;
use domain::Coordinate;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for a road routing engine
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RoadRoutingPort: Send + Sync {
    /// Decoded path from `origin` to `destination`
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<Coordinate>, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn RoadRoutingPort>();
    }
}
