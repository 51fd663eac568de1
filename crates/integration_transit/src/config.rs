//! Upstream service configuration

use serde::{Deserialize, Serialize};

/// Configuration for the multimodal trip backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripPlannerConfig {
    /// Base URL of the trip backend
    #[serde(default = "default_trip_planner_base_url")]
    pub base_url: String,

    /// Path of the trip search endpoint
    #[serde(default = "default_plan_trip_path")]
    pub plan_trip_path: String,

    /// Request timeout in seconds
    #[serde(default = "default_trip_planner_timeout_secs")]
    pub timeout_secs: u64,

    /// Bearer token sent with every request
    #[serde(default)]
    pub api_token: Option<String>,
}

fn default_trip_planner_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_plan_trip_path() -> String {
    "/api/auth/plan-trip/".to_string()
}

const fn default_trip_planner_timeout_secs() -> u64 {
    15
}

impl Default for TripPlannerConfig {
    fn default() -> Self {
        Self {
            base_url: default_trip_planner_base_url(),
            plan_trip_path: default_plan_trip_path(),
            timeout_secs: default_trip_planner_timeout_secs(),
            api_token: None,
        }
    }
}

impl TripPlannerConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Full URL of the trip search endpoint
    #[must_use]
    pub fn plan_trip_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.plan_trip_path.trim_start_matches('/')
        )
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if url::Url::parse(&self.base_url).is_err() {
            return Err(format!("base_url is not a valid URL: {}", self.base_url));
        }

        if self.plan_trip_path.is_empty() {
            return Err("plan_trip_path must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}

/// Configuration for the Valhalla road router
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValhallaConfig {
    /// Base URL of the Valhalla instance
    #[serde(default = "default_valhalla_base_url")]
    pub base_url: String,

    /// Costing model, e.g. "auto", "bicycle", "pedestrian"
    #[serde(default = "default_costing")]
    pub costing: String,

    /// Distance units for directions
    #[serde(default = "default_units")]
    pub units: String,

    /// Request timeout in seconds
    #[serde(default = "default_valhalla_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_valhalla_base_url() -> String {
    "https://valhalla1.openstreetmap.de".to_string()
}

fn default_costing() -> String {
    "auto".to_string()
}

fn default_units() -> String {
    "kilometers".to_string()
}

const fn default_valhalla_timeout_secs() -> u64 {
    10
}

impl Default for ValhallaConfig {
    fn default() -> Self {
        Self {
            base_url: default_valhalla_base_url(),
            costing: default_costing(),
            units: default_units(),
            timeout_secs: default_valhalla_timeout_secs(),
        }
    }
}

impl ValhallaConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if url::Url::parse(&self.base_url).is_err() {
            return Err(format!("base_url is not a valid URL: {}", self.base_url));
        }

        if self.costing.is_empty() {
            return Err("costing must not be empty".to_string());
        }

        if !matches!(self.units.as_str(), "kilometers" | "miles") {
            return Err(format!("units must be kilometers or miles, got {}", self.units));
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}
