//! Trip planner adapter - Implements TripPlannerPort using integration_transit

use std::sync::Arc;

use application::ApplicationError;
use application::ports::{TripPlannerPort, TripRequest};
use async_trait::async_trait;
use domain::RouteResponse;
use integration_transit::{PlanTripRequest, TripPlannerClient};
use tracing::{debug, instrument};

use super::map_upstream_error;
use crate::retry::{RetryConfig, retry};

const SERVICE: &str = "trip planner";

/// Adapter for the multimodal trip backend
pub struct TripPlannerAdapter {
    client: Arc<dyn TripPlannerClient>,
    retry: RetryConfig,
}

impl std::fmt::Debug for TripPlannerAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripPlannerAdapter")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl TripPlannerAdapter {
    /// Create a new adapter around a trip backend client
    #[must_use]
    pub fn new(client: Arc<dyn TripPlannerClient>) -> Self {
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

    fn to_wire(request: &TripRequest) -> PlanTripRequest {
        PlanTripRequest {
            from_lat: request.from_lat,
            from_lon: request.from_lon,
            to_lat: request.to_lat,
            to_lon: request.to_lon,
            date: request.date.clone(),
            time: request.time.clone(),
            requested_date: request.requested_date.clone(),
            requested_time: request.requested_time.clone(),
            mode: request.mode.to_string(),
        }
    }
}

#[async_trait]
impl TripPlannerPort for TripPlannerAdapter {
    #[instrument(skip(self, request), fields(mode = %request.mode))]
    async fn plan_trip(&self, request: &TripRequest) -> Result<RouteResponse, ApplicationError> {
        let body = Self::to_wire(request);
        let response = retry(&self.retry, || self.client.plan_trip(&body))
            .await
            .map_err(|e| map_upstream_error(SERVICE, e))?;

        debug!(options = response.option_count(), "Trip backend answered");
        Ok(response)
    }

    async fn is_available(&self) -> bool {
        self.client.is_healthy().await
    }
}
