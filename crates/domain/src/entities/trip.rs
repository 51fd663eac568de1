//! Upstream trip-planning payload
//!
//! Typed form of the multi-modal response returned by the trip-planning
//! backend: a map from transport mode to candidate options, each made of
//! chronologically ordered steps.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::services::polyline::{self, DecodeError};
use crate::value_objects::{Coordinate, Precision, TransportMode};

/// Step geometry as it appears on the wire
///
/// The backend sends an encoded polyline; already-decoded coordinate
/// arrays are accepted too and passed through untouched. A missing or
/// `null` geometry is an empty path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Geometry {
    /// Encoded polyline string
    Encoded(String),
    /// Ordered coordinate sequence
    Decoded(Vec<Coordinate>),
}

impl Default for Geometry {
    fn default() -> Self {
        Self::Decoded(Vec::new())
    }
}

impl<'de> Deserialize<'de> for Geometry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Encoded(String),
            Decoded(Vec<Coordinate>),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Encoded(s)) => Self::Encoded(s),
            Some(Raw::Decoded(c)) => Self::Decoded(c),
            None => Self::default(),
        })
    }
}

impl Geometry {
    /// Resolve to coordinates, decoding with `precision` if still encoded
    pub fn into_coordinates(self, precision: Precision) -> Result<Vec<Coordinate>, DecodeError> {
        match self {
            Self::Encoded(encoded) => polyline::decode(&encoded, precision),
            Self::Decoded(coordinates) => Ok(coordinates),
        }
    }
}

/// One leg of an itinerary
///
/// `G` is the geometry representation: [`Geometry`] on input,
/// `Vec<Coordinate>` once decoded (see [`DecodedStep`]). Upstream fields
/// without a dedicated member (`duration_s`, `distance_m`, `bus_name`, ...)
/// are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step<G = Geometry> {
    /// Step kind as reported upstream (e.g. "walk", "bus")
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub step_type: String,
    /// Departure place name
    #[serde(default, deserialize_with = "lenient_string")]
    pub from: String,
    /// Arrival place name
    #[serde(default, deserialize_with = "lenient_string")]
    pub to: String,
    /// Free-form duration text, e.g. "12m"
    #[serde(default, deserialize_with = "lenient_string")]
    pub duration: String,
    /// Departure time text
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_time: String,
    /// Arrival time text
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_time: String,
    /// Path of this step
    #[serde(default)]
    pub geometry: G,
    /// Line identifier, e.g. a bus number
    #[serde(
        default,
        deserialize_with = "lenient_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub route: Option<String>,
    /// Remaining upstream fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A step whose geometry has been decoded
pub type DecodedStep = Step<Vec<Coordinate>>;

impl<G> Step<G> {
    /// Replace the geometry, keeping every other field
    pub fn try_map_geometry<H, E>(self, f: impl FnOnce(G) -> Result<H, E>) -> Result<Step<H>, E> {
        Ok(Step {
            step_type: self.step_type,
            from: self.from,
            to: self.to,
            duration: self.duration,
            start_time: self.start_time,
            end_time: self.end_time,
            geometry: f(self.geometry)?,
            route: self.route,
            extra: self.extra,
        })
    }
}

impl Step {
    /// Decode this step's geometry
    pub fn decode(self, precision: Precision) -> Result<DecodedStep, DecodeError> {
        self.try_map_geometry(|geometry| geometry.into_coordinates(precision))
    }
}

/// Aggregate per-mode segment info some backends attach to an option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Mode of the segment
    #[serde(default, deserialize_with = "lenient_string")]
    pub mode: String,
    /// Segment start
    #[serde(default, deserialize_with = "lenient_string")]
    pub from: String,
    /// Segment end
    #[serde(default, deserialize_with = "lenient_string")]
    pub to: String,
    /// Length in meters
    #[serde(default)]
    pub distance_m: f64,
    /// Duration in seconds
    #[serde(default)]
    pub duration_s: f64,
    /// Number of legs merged into this segment
    #[serde(default)]
    pub legs_count: u32,
}

/// One candidate itinerary within a transport mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripOption {
    /// Ordinal assigned by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option: Option<u32>,
    /// Steps in travel order
    #[serde(default, alias = "legs")]
    pub steps: Vec<Step>,
    /// Backend's own distance estimate in meters (informational only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_distance_m: Option<f64>,
    /// Walking share in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub walk_distance_m: Option<f64>,
    /// Per-mode aggregates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<Segment>>,
}

impl TripOption {
    /// Option with the given ordinal and steps
    #[must_use]
    pub fn new(option: Option<u32>, steps: Vec<Step>) -> Self {
        Self {
            option,
            steps,
            total_distance_m: None,
            walk_distance_m: None,
            segments: None,
        }
    }
}

/// Ordered mapping from transport mode to its options
///
/// Iteration follows the order of the keys in the upstream JSON object,
/// also when parsed from a `serde_json::Value` (the workspace enables
/// `preserve_order`). A `null` list counts as empty; a repeated key
/// replaces the earlier list in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionsMap {
    entries: Vec<(TransportMode, Vec<TripOption>)>,
}

impl OptionsMap {
    /// Empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the options of a mode
    pub fn insert(&mut self, mode: TransportMode, options: Vec<TripOption>) {
        if let Some(entry) = self.entries.iter_mut().find(|(m, _)| *m == mode) {
            entry.1 = options;
        } else {
            self.entries.push((mode, options));
        }
    }

    /// Options of a mode, if the key is present
    #[must_use]
    pub fn get(&self, mode: TransportMode) -> Option<&[TripOption]> {
        self.entries
            .iter()
            .find(|(m, _)| *m == mode)
            .map(|(_, options)| options.as_slice())
    }

    /// Modes and their options in key order
    pub fn iter(&self) -> impl Iterator<Item = (TransportMode, &[TripOption])> {
        self.entries
            .iter()
            .map(|(mode, options)| (*mode, options.as_slice()))
    }

    /// Modes present, in key order
    pub fn modes(&self) -> impl Iterator<Item = TransportMode> + '_ {
        self.entries.iter().map(|(mode, _)| *mode)
    }

    /// Total number of options across all modes
    #[must_use]
    pub fn option_count(&self) -> usize {
        self.entries.iter().map(|(_, options)| options.len()).sum()
    }

    /// Whether no mode carries any option
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.option_count() == 0
    }
}

impl IntoIterator for OptionsMap {
    type Item = (TransportMode, Vec<TripOption>);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(TransportMode, Vec<TripOption>)> for OptionsMap {
    fn from_iter<I: IntoIterator<Item = (TransportMode, Vec<TripOption>)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (mode, options) in iter {
            map.insert(mode, options);
        }
        map
    }
}

impl Serialize for OptionsMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.entries.iter().map(|(mode, options)| (mode, options)))
    }
}

impl<'de> Deserialize<'de> for OptionsMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OptionsMapVisitor;

        impl<'de> Visitor<'de> for OptionsMapVisitor {
            type Value = OptionsMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from transport mode to a list of options")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = OptionsMap::new();
                while let Some((mode, options)) =
                    access.next_entry::<TransportMode, Option<Vec<TripOption>>>()?
                {
                    map.insert(mode, options.unwrap_or_default());
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OptionsMapVisitor)
    }
}

/// Raw response of the trip-planning backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    /// Name of the origin station
    #[serde(default, deserialize_with = "lenient_string")]
    pub from_station_name: String,
    /// Name of the destination station
    #[serde(default, deserialize_with = "lenient_string")]
    pub to_station_name: String,
    /// Options per mode; absent means nothing was found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<OptionsMap>,
}

impl RouteResponse {
    /// Response carrying no options at all
    #[must_use]
    pub fn empty(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from_station_name: from.into(),
            to_station_name: to.into(),
            options: None,
        }
    }

    /// Total number of options across all modes
    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.as_ref().map_or(0, OptionsMap::option_count)
    }
}

/// Accept strings, numbers, booleans and `null` for free-text fields
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_optional_string(deserializer).map(Option::unwrap_or_default)
}

fn lenient_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(de::Error::invalid_type(
            de::Unexpected::Other(value_kind(&other)),
            &"a string, number or null",
        )),
    }
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        _ => "scalar",
    }
}
