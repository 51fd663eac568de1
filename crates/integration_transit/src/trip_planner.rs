//! Trip backend client
//!
//! Posts trip searches to the multimodal backend and parses its
//! `mode -> options -> steps` response.

use std::time::Duration;

use async_trait::async_trait;
use domain::RouteResponse;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::config::TripPlannerConfig;
use crate::error::UpstreamError;
use crate::models::PlanTripRequest;

/// Trait for trip backend clients
#[async_trait]
pub trait TripPlannerClient: Send + Sync {
    /// Search itineraries between two points
    async fn plan_trip(&self, request: &PlanTripRequest) -> Result<RouteResponse, UpstreamError>;

    /// Check if the trip backend is reachable
    async fn is_healthy(&self) -> bool;
}

/// HTTP client for the trip backend
#[derive(Debug)]
pub struct HttpTripPlannerClient {
    client: Client,
    config: TripPlannerConfig,
}

impl HttpTripPlannerClient {
    /// Create a new trip backend client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &TripPlannerConfig) -> Result<Self, UpstreamError> {
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

    /// Parse a raw trip backend body
    fn parse_response(body: &str) -> Result<RouteResponse, UpstreamError> {
        serde_json::from_str(body).map_err(|e| UpstreamError::Parse(e.to_string()))
    }
}

#[async_trait]
impl TripPlannerClient for HttpTripPlannerClient {
    #[instrument(skip(self, request), fields(mode = %request.mode, date = %request.date, time = %request.time))]
    async fn plan_trip(&self, request: &PlanTripRequest) -> Result<RouteResponse, UpstreamError> {
        let url = self.config.plan_trip_url();
        debug!(%url, "Planning trip");

        let mut builder = self.client.post(&url).json(request);
        if let Some(token) = &self.config.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(&e, self.config.timeout_secs))?;

        if !response.status().is_success() {
            let err = UpstreamError::from_status(&response);
            warn!(error = %err, "Trip backend rejected request");
            return Err(err);
        }

        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::Parse(e.to_string()))?;

        let result = Self::parse_response(&body)?;
        if result.options.is_none() {
            debug!("Trip backend returned no options");
        }

        debug!(options = result.option_count(), "Trip options received");
        Ok(result)
    }

    #[instrument(skip(self))]
    async fn is_healthy(&self) -> bool {
        // Any HTTP answer below 500 means the backend is up
        match self.client.get(&self.config.base_url).send().await {
            Ok(response) => !response.status().is_server_error(),
            Err(e) => {
                debug!(error = %e, "Trip backend health check failed");
                false
            },
        }
    }
}
