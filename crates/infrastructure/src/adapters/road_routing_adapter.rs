//! Road routing adapter - Implements RoadRoutingPort using Valhalla

use std::sync::Arc;

use application::ApplicationError;
use application::ports::RoadRoutingPort;
use async_trait::async_trait;
use domain::services::decode;
use domain::{Coordinate, Precision};
use integration_transit::{RoadRoutingClient, ValhallaLocation};
use tracing::{debug, instrument, warn};

use super::map_upstream_error;
use crate::retry::{RetryConfig, retry};

const SERVICE: &str = "valhalla";

/// Adapter for Valhalla road routing
///
/// Leg shapes come back at six digits of precision and are joined into one path.
pub struct RoadRoutingAdapter {
    client: Arc<dyn RoadRoutingClient>,
    retry: RetryConfig,
}

impl std::fmt::Debug for RoadRoutingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoadRoutingAdapter")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl RoadRoutingAdapter {
    /// Create a new adapter around a Valhalla client
    #[must_use]
    pub fn new(client: Arc<dyn RoadRoutingClient>) -> Self {
        Self {
            client,
            retry: RetryConfig::default(),
        }
    }

    /// Override the retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn join_shapes(shapes: &[String]) -> Result<Vec<Coordinate>, ApplicationError> {
        let mut path = Vec::new();
        for shape in shapes {
            let leg = decode(shape, Precision::VALHALLA).inspect_err(|e| {
                warn!(error = %e, "Valhalla returned an undecodable shape");
            })?;
            // consecutive legs share their joint point
            let skip = usize::from(path.last().is_some_and(|last| leg.first() == Some(last)));
            path.extend(leg.into_iter().skip(skip));
        }
        Ok(path)
    }
}

fn location(coordinate: Coordinate) -> ValhallaLocation {
    ValhallaLocation {
        lat: coordinate.lat,
        lon: coordinate.lon,
    }
}

#[async_trait]
impl RoadRoutingPort for RoadRoutingAdapter {
    #[instrument(skip(self))]
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<Coordinate>, ApplicationError> {
        let shapes = retry(&self.retry, || {
            self.client
                .route_shapes(location(origin), location(destination))
        })
        .await
        .map_err(|e| map_upstream_error(SERVICE, e))?;

        let path = Self::join_shapes(&shapes)?;
        debug!(legs = shapes.len(), points = path.len(), "Decoded road route");
        Ok(path)
    }
}
