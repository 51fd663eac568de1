//! Transport mode keys

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transport modality used to partition itinerary options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// On foot
    Walk,
    /// Public bus
    Bus,
    /// Bicycle
    Bicycle,
    /// Shared scooter
    Scooter,
    /// Anything the backend does not classify
    Other,
}

impl TransportMode {
    /// All modes, in the order the backend usually emits them
    pub const ALL: [Self; 5] = [
        Self::Walk,
        Self::Bus,
        Self::Bicycle,
        Self::Scooter,
        Self::Other,
    ];

    /// Wire key of this mode
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Walk => "walk",
            Self::Bus => "bus",
            Self::Bicycle => "bicycle",
            Self::Scooter => "scooter",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| format!("Unknown transport mode: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_wire_key() {
        for mode in TransportMode::ALL {
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{mode}\""));
        }
    }

    #[test]
    fn from_str_round_trips() {
        for mode in TransportMode::ALL {
            assert_eq!(mode.as_str().parse::<TransportMode>().unwrap(), mode);
        }
    }

    #[test]
    fn from_str_rejects_unknown() {
        assert!("car".parse::<TransportMode>().is_err());
        assert!("Walk".parse::<TransportMode>().is_err());
    }
}
