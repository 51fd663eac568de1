//! Valhalla road routing client
//!
//! Calls the `/route` endpoint of a [Valhalla](https://valhalla.github.io/valhalla/)
//! instance and returns the encoded leg shapes. Shapes use six decimal
//! digits; decoding is left to the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::config::ValhallaConfig;
use crate::error::UpstreamError;
use crate::models::{DirectionsOptions, ValhallaLocation, ValhallaRouteRequest, ValhallaRouteResponse};

/// Trait for road routing clients
#[async_trait]
pub trait RoadRoutingClient: Send + Sync {
    /// Encoded shapes of every leg between the two points, in order
    async fn route_shapes(
        &self,
        origin: ValhallaLocation,
        destination: ValhallaLocation,
    ) -> Result<Vec<String>, UpstreamError>;
}

/// Valhalla HTTP client
#[derive(Debug)]
pub struct ValhallaClient {
    client: Client,
    config: ValhallaConfig,
}

impl ValhallaClient {
    /// Create a new Valhalla client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &ValhallaConfig) -> Result<Self, UpstreamError> {
        config.validate().map_err(UpstreamError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("Wayline/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpstreamError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn build_request(
        &self,
        origin: ValhallaLocation,
        destination: ValhallaLocation,
    ) -> ValhallaRouteRequest {
        ValhallaRouteRequest {
            locations: vec![origin, destination],
            costing: self.config.costing.clone(),
            directions_options: DirectionsOptions {
                units: self.config.units.clone(),
            },
        }
    }

    fn extract_shapes(response: ValhallaRouteResponse) -> Result<Vec<String>, UpstreamError> {
        let shapes: Vec<String> = response
            .trip
            .legs
            .into_iter()
            .map(|leg| leg.shape)
            .collect();
        if shapes.is_empty() {
            return Err(UpstreamError::NoRoute);
        }
        Ok(shapes)
    }
}

#[async_trait]
impl RoadRoutingClient for ValhallaClient {
    #[instrument(skip(self))]
    async fn route_shapes(
        &self,
        origin: ValhallaLocation,
        destination: ValhallaLocation,
    ) -> Result<Vec<String>, UpstreamError> {
        let url = format!("{}/route", self.config.base_url.trim_end_matches('/'));
        let body = self.build_request(origin, destination);

        debug!(%url, costing = %body.costing, "Requesting road route");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(&e, self.config.timeout_secs))?;

        // Valhalla answers 400 when no path exists between the points
        if response.status() == reqwest::StatusCode::BAD_REQUEST {
            return Err(UpstreamError::NoRoute);
        }
        if !response.status().is_success() {
            return Err(UpstreamError::from_status(&response));
        }

        let parsed: ValhallaRouteResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::Parse(e.to_string()))?;

        if let Some(summary) = parsed.trip.summary {
            debug!(length = summary.length, time_secs = summary.time, "Road route found");
        }

        Self::extract_shapes(parsed)
    }
}
