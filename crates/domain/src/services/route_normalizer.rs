//! Route normalization
//!
//! Flattens a [`RouteResponse`] (`mode -> options -> steps`) into a list
//! of [`Route`] records with decoded geometry and derived totals.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::polyline::DecodeError;
use crate::entities::{DecodedStep, Route, RouteResponse, TripOption};
use crate::value_objects::{Coordinate, Precision, TransportMode};

/// First run of ASCII digits followed by `m`, e.g. "12m" or the "30m" in "1h 30m"
#[allow(clippy::expect_used)]
static DURATION_MINUTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)m").expect("duration pattern is valid"));

/// Minutes encoded in a free-form step duration
///
/// Only the `<digits>m` form is understood; anything else counts as zero
/// ("abc" and "1h" both give 0). Values too large for `u32` saturate.
#[must_use]
pub fn parse_duration_minutes(duration: &str) -> u32 {
    DURATION_MINUTES
        .captures(duration)
        .and_then(|captures| captures.get(1))
        .map_or(0, |digits| digits.as_str().parse().unwrap_or(u32::MAX))
}

/// Sum of haversine distances between consecutive points, in kilometers
///
/// Zero for fewer than two points.
#[must_use]
pub fn path_length_km(path: &[Coordinate]) -> f64 {
    path.windows(2)
        .map(|pair| pair[0].distance_km(&pair[1]))
        .sum()
}

/// Round to two decimal places
#[must_use]
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Turns upstream trip responses into flat route lists
///
/// The normalizer preserves upstream order (mode keys, then option
/// index). Sorting is left to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteNormalizer {
    precision: Precision,
}

impl RouteNormalizer {
    /// Normalizer decoding step geometry at the given precision
    #[must_use]
    pub const fn new(precision: Precision) -> Self {
        Self { precision }
    }

    /// Precision used for encoded step geometry
    #[must_use]
    pub const fn precision(&self) -> Precision {
        self.precision
    }

    /// Normalize a response into one route per option
    ///
    /// A response without an options map yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns the first [`DecodeError`] hit while decoding step geometry.
    pub fn normalize(&self, response: RouteResponse) -> Result<Vec<Route>, DecodeError> {
        let RouteResponse {
            from_station_name,
            to_station_name,
            options,
        } = response;

        let Some(options) = options else {
            return Ok(Vec::new());
        };

        let mut routes = Vec::with_capacity(options.option_count());
        let mut seen_ids = HashSet::with_capacity(options.option_count());

        for (mode, mode_options) in options {
            for (index, option) in mode_options.into_iter().enumerate() {
                let id = unique_id(&mut seen_ids, mode, option.option, index);
                let route = self.normalize_option(
                    id,
                    mode,
                    option,
                    &from_station_name,
                    &to_station_name,
                )?;
                routes.push(route);
            }
        }

        Ok(routes)
    }

    fn normalize_option(
        &self,
        id: String,
        mode: TransportMode,
        option: TripOption,
        from_station_name: &str,
        to_station_name: &str,
    ) -> Result<Route, DecodeError> {
        let steps = option
            .steps
            .into_iter()
            .map(|step| step.decode(self.precision))
            .collect::<Result<Vec<DecodedStep>, _>>()?;

        let duration = steps
            .iter()
            .map(|step| parse_duration_minutes(&step.duration))
            .fold(0u32, u32::saturating_add);

        // Per-step lengths stay unrounded; only the total is rounded
        let distance = round_to_hundredths(
            steps
                .iter()
                .map(|step| path_length_km(&step.geometry))
                .sum(),
        );

        Ok(Route {
            id,
            from_station_name: from_station_name.to_string(),
            to_station_name: to_station_name.to_string(),
            mode,
            duration,
            distance,
            steps,
            walk_distance: option.walk_distance_m,
            segments: option.segments,
        })
    }
}

/// `"<mode>-<ordinal>"`, falling back to the array index when the ordinal
/// is missing. Repeated upstream ordinals get `-<index>` appended.
fn unique_id(
    seen: &mut HashSet<String>,
    mode: TransportMode,
    ordinal: Option<u32>,
    index: usize,
) -> String {
    let base = match ordinal {
        Some(ordinal) => format!("{mode}-{ordinal}"),
        None => format!("{mode}-{index}"),
    };
    if seen.insert(base.clone()) {
        return base;
    }

    let mut candidate = format!("{base}-{index}");
    let mut attempt = 1;
    while !seen.insert(candidate.clone()) {
        candidate = format!("{base}-{index}-{attempt}");
        attempt += 1;
    }
    candidate
}
