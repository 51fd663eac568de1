//! Trip planning service
//!
//! Calls the trip backend, normalizes the answer into flat routes and
//! orders them fastest first. Optionally retries later departures when
//! nothing runs at the requested time.

use std::fmt;
use std::sync::Arc;

use chrono::{NaiveTime, Timelike};
use domain::{Coordinate, Precision, Route, RouteNormalizer, sort_by_duration};
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{RoadRoutingPort, TripPlannerPort, TripRequest};

/// Default number of searches in a fallback run
pub const DEFAULT_FALLBACK_ATTEMPTS: u32 = 10;

/// Default shift between fallback searches in minutes
pub const DEFAULT_FALLBACK_STEP_MINUTES: u32 = 30;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// How far a fallback search may move the departure time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackPolicy {
    /// Searches in total, the first one included
    pub max_attempts: u32,
    /// Minutes added to the departure time after an empty search
    pub step_minutes: u32,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_FALLBACK_ATTEMPTS,
            step_minutes: DEFAULT_FALLBACK_STEP_MINUTES,
        }
    }
}

/// Departure time `step_minutes` after `time`, as `HH:MM:00`
///
/// Returns `None` when `time` is not a clock time (e.g. "timenow") or the
/// shifted time would reach midnight.
#[must_use]
pub fn next_departure(time: &str, step_minutes: u32) -> Option<String> {
    let parsed = NaiveTime::parse_from_str(time, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
        .ok()?;
    let minutes = parsed.hour() * 60 + parsed.minute() + step_minutes;
    if minutes >= MINUTES_PER_DAY {
        return None;
    }
    Some(format!("{:02}:{:02}:00", minutes / 60, minutes % 60))
}

/// Use cases around trip search and road geometry
pub struct TripPlanningService {
    trip_planner: Arc<dyn TripPlannerPort>,
    road_routing: Option<Arc<dyn RoadRoutingPort>>,
    normalizer: RouteNormalizer,
    fallback: FallbackPolicy,
}

impl fmt::Debug for TripPlanningService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TripPlanningService")
            .field("normalizer", &self.normalizer)
            .field("road_routing", &self.road_routing.is_some())
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

impl TripPlanningService {
    /// Create a service decoding trip geometry at the trip backend's 1e5
    #[must_use]
    pub fn new(trip_planner: Arc<dyn TripPlannerPort>) -> Self {
        Self {
            trip_planner,
            road_routing: None,
            normalizer: RouteNormalizer::new(Precision::TRIP_PLANNER),
            fallback: FallbackPolicy::default(),
        }
    }

    /// Add a road routing engine for [`Self::road_route`]
    #[must_use]
    pub fn with_road_routing(mut self, road_routing: Arc<dyn RoadRoutingPort>) -> Self {
        self.road_routing = Some(road_routing);
        self
    }

    /// Override the fallback search limits
    #[must_use]
    pub const fn with_fallback_policy(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Search once and return routes sorted by duration
    ///
    /// Routes with equal duration keep the backend's order.
    #[instrument(skip(self, request), fields(mode = %request.mode, time = %request.time))]
    pub async fn plan(&self, request: &TripRequest) -> Result<Vec<Route>, ApplicationError> {
        request.validate()?;

        let response = self.trip_planner.plan_trip(request).await?;
        let options = response.option_count();
        let mut routes = self.normalizer.normalize(response)?;
        sort_by_duration(&mut routes);

        debug!(options, routes = routes.len(), "Trip search normalized");
        Ok(routes)
    }

    /// Search, moving the departure later until something is found
    ///
    /// Stops at the first non-empty result, after the policy's attempt
    /// limit, or before crossing midnight. Upstream errors abort the run.
    #[instrument(skip(self, request), fields(date = %request.date, time = %request.time))]
    pub async fn plan_with_fallback(
        &self,
        request: &TripRequest,
    ) -> Result<Vec<Route>, ApplicationError> {
        let mut attempt_request = request.clone();

        for attempt in 1..=self.fallback.max_attempts {
            attempt_request.requested_date = Some(attempt_request.date.clone());
            attempt_request.requested_time = Some(attempt_request.time.clone());

            let routes = self.plan(&attempt_request).await?;
            if !routes.is_empty() {
                info!(attempt, time = %attempt_request.time, "Routes found");
                return Ok(routes);
            }

            let Some(next) = next_departure(&attempt_request.time, self.fallback.step_minutes)
            else {
                break;
            };
            debug!(attempt, next = %next, "No routes, retrying later");
            attempt_request.time = next;
        }

        warn!("No routes found before end of day");
        Ok(Vec::new())
    }

    /// Road geometry between two points
    #[instrument(skip(self))]
    pub async fn road_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<Coordinate>, ApplicationError> {
        for point in [origin, destination] {
            Coordinate::validated(point.lat, point.lon)
                .map_err(|e| ApplicationError::InvalidInput(e.to_string()))?;
        }

        let routing = self.road_routing.as_ref().ok_or_else(|| {
            ApplicationError::Configuration("road routing is not configured".into())
        })?;

        let path = routing.route(origin, destination).await?;
        debug!(points = path.len(), "Road route resolved");
        Ok(path)
    }

    /// Check if the trip backend is reachable
    pub async fn is_trip_planner_available(&self) -> bool {
        self.trip_planner.is_available().await
    }
}
