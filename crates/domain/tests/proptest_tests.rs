//! Property-based tests for the polyline codec and route normalizer
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::services::{decode, encode, path_length_km, round_to_hundredths};
use domain::{
    Coordinate, Geometry, OptionsMap, Precision, RouteNormalizer, RouteResponse, Step,
    TransportMode, TripOption,
};
use proptest::prelude::*;

fn coordinate() -> impl Strategy<Value = Coordinate> {
    (-90.0f64..=90.0f64, -180.0f64..=180.0f64).prop_map(|(lat, lon)| Coordinate::new(lat, lon))
}

fn path(max_len: usize) -> impl Strategy<Value = Vec<Coordinate>> {
    prop::collection::vec(coordinate(), 0..max_len)
}

fn precision() -> impl Strategy<Value = Precision> {
    prop_oneof![Just(Precision::TRIP_PLANNER), Just(Precision::VALHALLA)]
}

fn mode() -> impl Strategy<Value = TransportMode> {
    prop::sample::select(TransportMode::ALL.to_vec())
}

fn step_with(geometry: Vec<Coordinate>, duration: String) -> Step {
    Step {
        step_type: "walk".to_string(),
        from: String::new(),
        to: String::new(),
        duration,
        start_time: String::new(),
        end_time: String::new(),
        geometry: Geometry::Encoded(encode(&geometry, Precision::TRIP_PLANNER)),
        route: None,
        extra: serde_json::Map::new(),
    }
}

// ============================================================================
// Polyline codec
// ============================================================================

mod polyline_tests {
    use super::*;

    proptest! {
        #[test]
        fn round_trip_within_one_unit(points in path(40), precision in precision()) {
            let encoded = encode(&points, precision);
            let decoded = decode(&encoded, precision).unwrap();

            prop_assert_eq!(decoded.len(), points.len());
            let tolerance = 1.0 / precision.divisor();
            for (original, back) in points.iter().zip(&decoded) {
                prop_assert!((original.lat - back.lat).abs() <= tolerance);
                prop_assert!((original.lon - back.lon).abs() <= tolerance);
            }
        }

        #[test]
        fn encoded_output_stays_in_alphabet(points in path(20), precision in precision()) {
            let encoded = encode(&points, precision);
            prop_assert!(encoded.bytes().all(|b| (b'?'..=b'~').contains(&b)));
        }

        #[test]
        fn decode_never_panics(input in ".{0,64}", precision in precision()) {
            let _ = decode(&input, precision);
        }

        #[test]
        fn strict_prefixes_of_a_point_are_truncated(points in path(5).prop_filter("non-empty", |p| !p.is_empty())) {
            let encoded = encode(&points, Precision::TRIP_PLANNER);
            let first_point = encode(&points[..1], Precision::TRIP_PLANNER);
            for cut in 1..first_point.len() {
                prop_assert!(decode(&encoded[..cut], Precision::TRIP_PLANNER).is_err());
            }
        }
    }
}

// ============================================================================
// Route normalizer
// ============================================================================

mod normalizer_tests {
    use super::*;

    fn options_map() -> impl Strategy<Value = OptionsMap> {
        prop::collection::vec(
            (
                mode(),
                prop::collection::vec(
                    (
                        prop::option::of(0u32..4),
                        prop::collection::vec((path(6), 0u32..120), 0..4),
                    ),
                    0..4,
                ),
            ),
            0..6,
        )
        .prop_map(|modes| {
            modes
                .into_iter()
                .map(|(mode, options)| {
                    let options = options
                        .into_iter()
                        .map(|(ordinal, steps)| {
                            let steps = steps
                                .into_iter()
                                .map(|(geometry, minutes)| step_with(geometry, format!("{minutes}m")))
                                .collect();
                            TripOption::new(ordinal, steps)
                        })
                        .collect();
                    (mode, options)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn one_route_per_option(options in options_map()) {
            let response = RouteResponse {
                from_station_name: "A".to_string(),
                to_station_name: "B".to_string(),
                options: Some(options),
            };
            let expected = response.option_count();

            let routes = RouteNormalizer::new(Precision::TRIP_PLANNER)
                .normalize(response)
                .unwrap();
            prop_assert_eq!(routes.len(), expected);
        }

        #[test]
        fn ids_are_unique(options in options_map()) {
            let response = RouteResponse {
                from_station_name: String::new(),
                to_station_name: String::new(),
                options: Some(options),
            };
            let routes = RouteNormalizer::new(Precision::TRIP_PLANNER)
                .normalize(response)
                .unwrap();

            let mut ids: Vec<_> = routes.iter().map(|r| r.id.clone()).collect();
            let before = ids.len();
            ids.sort();
            ids.dedup();
            prop_assert_eq!(ids.len(), before);
        }

        #[test]
        fn totals_are_derived_and_non_negative(options in options_map()) {
            let response = RouteResponse {
                from_station_name: String::new(),
                to_station_name: String::new(),
                options: Some(options),
            };
            let routes = RouteNormalizer::new(Precision::TRIP_PLANNER)
                .normalize(response)
                .unwrap();

            for route in routes {
                prop_assert!(route.distance >= 0.0);
                let expected: f64 = route.steps.iter().map(|s| path_length_km(&s.geometry)).sum();
                prop_assert!((route.distance - round_to_hundredths(expected)).abs() < 1e-9);

                let minutes: u32 = route
                    .steps
                    .iter()
                    .map(|s| s.duration.trim_end_matches('m').parse::<u32>().unwrap_or(0))
                    .sum();
                prop_assert_eq!(route.duration, minutes);
            }
        }
    }
}
