//! Offline commands and argument parsing helpers

use std::path::Path;

use anyhow::Context;
use domain::services::{decode, encode};
use domain::{Coordinate, Precision, Route, RouteNormalizer, RouteResponse, sort_by_duration};

/// Parse `5` or `6` (any supported digit count) into a precision
pub fn parse_precision(value: &str) -> Result<Precision, String> {
    let digits: u32 = value
        .trim()
        .parse()
        .map_err(|_| format!("precision must be a number of digits, got '{value}'"))?;
    Precision::from_digits(digits).ok_or_else(|| format!("unsupported precision: {digits} digits"))
}

/// Parse `LAT,LON` into a validated coordinate
pub fn parse_coordinate(value: &str) -> Result<Coordinate, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got '{value}'"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude '{lat}'"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude '{lon}'"))?;
    Coordinate::validated(lat, lon).map_err(|e| e.to_string())
}

/// Decode a polyline and render the points as pretty JSON
pub fn decode_polyline(encoded: &str, precision: Precision) -> anyhow::Result<String> {
    let points = decode(encoded, precision).context("failed to decode polyline")?;
    Ok(serde_json::to_string_pretty(&points)?)
}

/// Encode points into a polyline
pub fn encode_points(points: &[Coordinate], precision: Precision) -> String {
    encode(points, precision)
}

/// Normalize a trip response stored as JSON
pub fn normalize_file(path: &Path, precision: Precision, sort: bool) -> anyhow::Result<Vec<Route>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    normalize_json(&raw, precision, sort)
}

/// Normalize a trip response given as JSON text
pub fn normalize_json(raw: &str, precision: Precision, sort: bool) -> anyhow::Result<Vec<Route>> {
    let response: RouteResponse =
        serde_json::from_str(raw).context("input is not a valid trip response")?;
    let mut routes = RouteNormalizer::new(precision)
        .normalize(response)
        .context("failed to decode step geometry")?;
    if sort {
        sort_by_duration(&mut routes);
    }
    Ok(routes)
}

/// One line per route: id, minutes, kilometers
pub fn summarize(routes: &[Route]) -> String {
    routes
        .iter()
        .map(|route| {
            format!(
                "{:<12} {:>4} min {:>8.2} km  {} -> {}",
                route.id,
                route.duration,
                route.distance,
                route.from_station_name,
                route.to_station_name
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SAMPLE: &str = r#"{
        "fromStationName": "Porta Nuova",
        "toStationName": "Politecnico",
        "options": {
            "walk": [{"option": 0, "steps": [
                {"type": "walk", "duration": "24m", "geometry": "_p~iF~ps|U_ulLnnqC"}
            ]}],
            "bus": [{"option": 0, "legs": [
                {"type": "bus", "duration": "11m", "geometry": null}
            ]}]
        }
    }"#;

    #[test]
    fn precision_parsing() {
        assert_eq!(parse_precision("5").unwrap(), Precision::TRIP_PLANNER);
        assert_eq!(parse_precision("6").unwrap(), Precision::VALHALLA);
        assert!(parse_precision("five").is_err());
        assert!(parse_precision("40").is_err());
    }

    #[test]
    fn coordinate_parsing() {
        assert_eq!(
            parse_coordinate("38.5,-120.2").unwrap(),
            Coordinate::new(38.5, -120.2)
        );
        assert_eq!(
            parse_coordinate(" 45.07 , 7.68 ").unwrap(),
            Coordinate::new(45.07, 7.68)
        );
        assert!(parse_coordinate("45.07").is_err());
        assert!(parse_coordinate("north,7.68").is_err());
        assert!(parse_coordinate("91,0").is_err());
    }

    #[test]
    fn decode_renders_reference_points() {
        let json = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@", Precision::TRIP_PLANNER).unwrap();
        let points: Vec<Coordinate> = serde_json::from_str(&json).unwrap();
        assert_eq!(points.len(), 3);
        assert!((points[2].lat - 43.252).abs() < 1e-9);
        assert!((points[2].lon + 126.453).abs() < 1e-9);
    }

    #[test]
    fn decode_reports_truncated_input() {
        let err = decode_polyline("_p~iF~ps|U_", Precision::TRIP_PLANNER).unwrap_err();
        assert!(err.to_string().contains("decode"));
    }

    #[test]
    fn encode_reference_points() {
        let points = [
            Coordinate::new(38.5, -120.2),
            Coordinate::new(40.7, -120.95),
            Coordinate::new(43.252, -126.453),
        ];
        assert_eq!(
            encode_points(&points, Precision::TRIP_PLANNER),
            "_p~iF~ps|U_ulLnnqC_mqNvxq`@"
        );
    }

    #[test]
    fn normalize_keeps_upstream_order_unless_sorted() {
        let routes = normalize_json(SAMPLE, Precision::TRIP_PLANNER, false).unwrap();
        let ids: Vec<_> = routes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["walk-0", "bus-0"]);

        let routes = normalize_json(SAMPLE, Precision::TRIP_PLANNER, true).unwrap();
        let ids: Vec<_> = routes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["bus-0", "walk-0"]);
    }

    #[test]
    fn normalize_file_reads_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let routes = normalize_file(file.path(), Precision::TRIP_PLANNER, true).unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].duration, 11);
    }

    #[test]
    fn normalize_rejects_garbage() {
        assert!(normalize_json("not json", Precision::TRIP_PLANNER, false).is_err());
        assert!(normalize_file(Path::new("/nonexistent/trip.json"), Precision::TRIP_PLANNER, false).is_err());
    }

    #[test]
    fn summary_has_one_line_per_route() {
        let routes = normalize_json(SAMPLE, Precision::TRIP_PLANNER, true).unwrap();
        let summary = summarize(&routes);
        assert_eq!(summary.lines().count(), 2);
        assert!(summary.lines().next().unwrap().starts_with("bus-0"));
        assert!(summary.contains("Porta Nuova -> Politecnico"));
    }
}
