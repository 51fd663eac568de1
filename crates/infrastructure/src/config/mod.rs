//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `planning`: fallback search limits
//!
//! Upstream sections reuse the integration crate's config types.

mod planning;
mod server;

use std::fmt;

use integration_transit::{NominatimConfig, TripPlannerConfig, ValhallaConfig};
use serde::{Deserialize, Serialize};

use crate::retry::RetryConfig;

pub use planning::PlanningAppConfig;
pub use server::{LogFormat, ServerConfig};

/// Environment variable prefix, e.g. `WAYLINE_SERVER__PORT`
pub const ENV_PREFIX: &str = "WAYLINE";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Application environment (development or production)
///
/// Production hides internal error details from API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Production environment
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development' or 'production'"
            )),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development or production)
    #[serde(default)]
    pub environment: Option<Environment>,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Trip backend
    #[serde(default)]
    pub trip_planner: TripPlannerConfig,

    /// Valhalla road router
    #[serde(default)]
    pub valhalla: ValhallaConfig,

    /// Nominatim geocoder
    #[serde(default)]
    pub geocoding: NominatimConfig,

    /// Fallback search limits
    #[serde(default)]
    pub planning: PlanningAppConfig,

    /// Retry policy for upstream calls
    #[serde(default)]
    pub retry: RetryConfig,
}

impl AppConfig {
    /// Load configuration from environment and optional file
    ///
    /// Sources, later ones winning: built-in defaults, `config.toml` in the
    /// working directory (optional), `WAYLINE_*` environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration using `file` (without extension) as the optional file source
    pub fn load_from(file: &str) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // Start with defaults
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            // Load from file if exists
            .add_source(config::File::with_name(file).required(false))
            // Override with environment variables (e.g., WAYLINE_SERVER__PORT)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Effective environment
    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment.unwrap_or_default()
    }

    /// Whether the server runs in production mode
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.environment() == Environment::Production
    }

    /// Validate every section, collecting all problems
    ///
    /// # Errors
    ///
    /// Returns one message per invalid setting, prefixed by its section.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let checks = [
            ("trip_planner", self.trip_planner.validate()),
            ("valhalla", self.valhalla.validate()),
            ("geocoding", self.geocoding.validate()),
            ("planning", self.planning.validate()),
            ("retry", self.retry.validate()),
        ];

        let mut errors: Vec<String> = checks
            .into_iter()
            .filter_map(|(section, result)| result.err().map(|e| format!("{section}: {e}")))
            .collect();

        if self.server.port == 0 {
            errors.push("server: port must be greater than 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
