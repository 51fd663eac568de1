//! Application state shared across handlers

use std::sync::Arc;

use application::TripPlanningService;
use application::ports::GeocodingPort;
use infrastructure::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Trip search, sorting and road routing
    pub trip_service: Arc<TripPlanningService>,
    /// Nominatim proxy
    pub geocoding: Arc<dyn GeocodingPort>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("trip_service", &self.trip_service)
            .field("geocoding", &"<GeocodingPort>")
            .finish_non_exhaustive()
    }
}
