//! Trip planning behavior.

use application::{DEFAULT_FALLBACK_ATTEMPTS, DEFAULT_FALLBACK_STEP_MINUTES, FallbackPolicy};
use serde::{Deserialize, Serialize};

/// Limits for the later-departure fallback search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningAppConfig {
    /// Searches in total, the first one included
    #[serde(default = "default_fallback_attempts")]
    pub fallback_max_attempts: u32,

    /// Minutes added to the departure time after an empty search
    #[serde(default = "default_fallback_step_minutes")]
    pub fallback_step_minutes: u32,
}

const fn default_fallback_attempts() -> u32 {
    DEFAULT_FALLBACK_ATTEMPTS
}

const fn default_fallback_step_minutes() -> u32 {
    DEFAULT_FALLBACK_STEP_MINUTES
}

impl Default for PlanningAppConfig {
    fn default() -> Self {
        Self {
            fallback_max_attempts: default_fallback_attempts(),
            fallback_step_minutes: default_fallback_step_minutes(),
        }
    }
}

impl PlanningAppConfig {
    /// Policy handed to the trip planning service
    #[must_use]
    pub const fn fallback_policy(&self) -> FallbackPolicy {
        FallbackPolicy {
            max_attempts: self.fallback_max_attempts,
            step_minutes: self.fallback_step_minutes,
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.fallback_max_attempts == 0 {
            return Err("fallback_max_attempts must be greater than 0".to_string());
        }
        if self.fallback_step_minutes == 0 || self.fallback_step_minutes >= 24 * 60 {
            return Err("fallback_step_minutes must be between 1 and 1439".to_string());
        }
        Ok(())
    }
}
