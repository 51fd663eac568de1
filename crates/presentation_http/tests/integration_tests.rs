//! Integration tests for HTTP handlers
#![allow(clippy::expect_used)]

use std::sync::{Arc, Mutex};

use application::{
    TripPlanningService,
    error::ApplicationError,
    ports::{GeocodingPort, Place, RoadRoutingPort, TripPlannerPort, TripRequest},
};
use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use domain::{Coordinate, DecodeError, RouteResponse};
use infrastructure::AppConfig;
use presentation_http::{routes::create_router, state::AppState};
use serde_json::json;

/// What the mock trip backend answers
#[derive(Clone, Copy)]
enum Backend {
    /// Two options: a 24 minute walk and a 15 minute bus ride
    Routes,
    /// Empty options until the given departure time
    RoutesFrom(&'static str),
    /// Response whose geometry does not decode
    Malformed,
    Unavailable,
    RateLimited,
}

/// Mock trip backend recording every request
struct MockTripPlanner {
    backend: Backend,
    healthy: bool,
    seen: Mutex<Vec<TripRequest>>,
}

impl MockTripPlanner {
    fn new(backend: Backend) -> Self {
        Self {
            backend,
            healthy: true,
            seen: Mutex::new(Vec::new()),
        }
    }

    fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new(Backend::Routes)
        }
    }
}

fn routes_response() -> RouteResponse {
    serde_json::from_value(json!({
        "fromStationName": "Porta Nuova",
        "toStationName": "Politecnico",
        "options": {
            "walk": [{
                "option": 0,
                "steps": [{
                    "type": "walk", "from": "Porta Nuova", "to": "Politecnico",
                    "duration": "24m", "geometry": "_p~iF~ps|U_ulLnnqC"
                }]
            }],
            "bus": [{
                "option": 0,
                "legs": [{
                    "type": "bus", "from": "Porta Nuova", "to": "Politecnico",
                    "duration": "15m", "route": "68", "geometry": null
                }]
            }]
        }
    }))
    .expect("valid trip response")
}

#[async_trait]
impl TripPlannerPort for MockTripPlanner {
    async fn plan_trip(&self, request: &TripRequest) -> Result<RouteResponse, ApplicationError> {
        self.seen.lock().expect("lock").push(request.clone());

        match self.backend {
            Backend::Routes => Ok(routes_response()),
            Backend::RoutesFrom(time) if request.time.as_str() >= time => Ok(routes_response()),
            Backend::RoutesFrom(_) => Ok(RouteResponse::empty("Porta Nuova", "Politecnico")),
            Backend::Malformed => Err(DecodeError::Truncated { position: 10 }.into()),
            Backend::Unavailable => Err(ApplicationError::ExternalService(
                "trip planner request failed: connection refused".to_string(),
            )),
            Backend::RateLimited => Err(ApplicationError::RateLimited),
        }
    }

    async fn is_available(&self) -> bool {
        self.healthy
    }
}

/// Mock road router returning a straight segment
struct MockRoadRouting;

#[async_trait]
impl RoadRoutingPort for MockRoadRouting {
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<Coordinate>, ApplicationError> {
        if origin == destination {
            return Err(ApplicationError::NotFound("valhalla: no route".to_string()));
        }
        Ok(vec![origin, destination])
    }
}

/// Mock geocoder
struct MockGeocoding;

#[async_trait]
impl GeocodingPort for MockGeocoding {
    async fn search(&self, query: &str, limit: u8) -> Result<Vec<Place>, ApplicationError> {
        Ok((0..limit.min(3))
            .map(|i| Place {
                display_name: format!("{query} #{i}"),
                lat: 45.06,
                lon: 7.67,
                category: Some("railway".to_string()),
                place_type: Some("station".to_string()),
                importance: None,
            })
            .collect())
    }

    async fn reverse(&self, coordinate: Coordinate) -> Result<Place, ApplicationError> {
        if coordinate.lat > 80.0 {
            return Err(ApplicationError::NotFound("Unable to geocode".to_string()));
        }
        Ok(Place {
            display_name: "Via Roma, Torino".to_string(),
            lat: coordinate.lat,
            lon: coordinate.lon,
            category: None,
            place_type: None,
            importance: None,
        })
    }
}

fn create_test_server_with(trip_planner: Arc<MockTripPlanner>) -> TestServer {
    let service = TripPlanningService::new(trip_planner).with_road_routing(Arc::new(MockRoadRouting));
    let state = AppState {
        trip_service: Arc::new(service),
        geocoding: Arc::new(MockGeocoding),
        config: Arc::new(AppConfig::default()),
    };
    TestServer::new(create_router(state)).expect("Failed to create test server")
}

fn create_test_server(backend: Backend) -> TestServer {
    create_test_server_with(Arc::new(MockTripPlanner::new(backend)))
}

fn trip_body() -> serde_json::Value {
    json!({
        "fromLat": 45.0703, "fromLon": 7.6869,
        "toLat": 45.0623, "toLon": 7.6625,
        "date": "2025-05-12", "time": "08:00:00",
        "mode": "all"
    })
}

// ============ Health Endpoint Tests ============

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let server = create_test_server(Backend::Routes);

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn readiness_endpoint_returns_ready_when_healthy() {
    let server = create_test_server(Backend::Routes);

    let response = server.get("/ready").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["ready"], true);
    assert_eq!(body["trip_planner"]["healthy"], true);
}

#[tokio::test]
async fn readiness_endpoint_returns_unavailable_when_unhealthy() {
    let server = create_test_server_with(Arc::new(MockTripPlanner::unhealthy()));

    let response = server.get("/ready").await;

    response.assert_status_service_unavailable();
    let body: serde_json::Value = response.json();
    assert_eq!(body["ready"], false);
}

// ============ Trip Planning Tests ============

#[tokio::test]
async fn plan_trip_returns_routes_sorted_by_duration() {
    let server = create_test_server(Backend::Routes);

    let response = server.post("/api/plan-trip").json(&trip_body()).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let routes = body["routes"].as_array().expect("routes array");
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0]["id"], "bus-0");
    assert_eq!(routes[0]["duration"], 15);
    assert_eq!(routes[1]["id"], "walk-0");
    assert_eq!(routes[1]["duration"], 24);
    assert_eq!(routes[1]["steps"][0]["geometry"][0]["lat"], 38.5);
}

#[tokio::test]
async fn plan_trip_without_results_returns_empty_list() {
    let server = create_test_server(Backend::RoutesFrom("23:59:00"));

    let response = server.post("/api/plan-trip").json(&trip_body()).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["routes"], json!([]));
}

#[tokio::test]
async fn plan_trip_fallback_searches_later_departures() {
    let planner = Arc::new(MockTripPlanner::new(Backend::RoutesFrom("09:00:00")));
    let server = create_test_server_with(Arc::clone(&planner));

    let mut body = trip_body();
    body["fallback"] = json!(true);
    let response = server.post("/api/plan-trip").json(&body).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["routes"].as_array().map(Vec::len), Some(2));

    let seen = planner.seen.lock().expect("lock");
    let times: Vec<&str> = seen.iter().map(|r| r.time.as_str()).collect();
    assert_eq!(times, ["08:00:00", "08:30:00", "09:00:00"]);
    assert_eq!(seen[2].requested_time.as_deref(), Some("09:00:00"));
}

#[tokio::test]
async fn plan_trip_decode_failure_is_bad_gateway() {
    let server = create_test_server(Backend::Malformed);

    let response = server.post("/api/plan-trip").json(&trip_body()).await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Failed to fetch route");
    assert_eq!(body["code"], "bad_gateway");
}

#[tokio::test]
async fn plan_trip_upstream_down_is_service_unavailable() {
    let server = create_test_server(Backend::Unavailable);

    let response = server.post("/api/plan-trip").json(&trip_body()).await;

    response.assert_status_service_unavailable();
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "service_unavailable");
}

#[tokio::test]
async fn plan_trip_rate_limited() {
    let server = create_test_server(Backend::RateLimited);

    let response = server.post("/api/plan-trip").json(&trip_body()).await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn plan_trip_rejects_invalid_coordinates() {
    let planner = Arc::new(MockTripPlanner::new(Backend::Routes));
    let server = create_test_server_with(Arc::clone(&planner));

    let mut body = trip_body();
    body["fromLat"] = json!(123.0);
    let response = server.post("/api/plan-trip").json(&body).await;

    response.assert_status_bad_request();
    assert!(planner.seen.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn plan_trip_rejects_malformed_body() {
    let server = create_test_server(Backend::Routes);

    let response = server
        .post("/api/plan-trip")
        .json(&json!({"fromLat": 45.0, "mode": "teleport"}))
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "bad_request");
}

// ============ Road Routing Tests ============

#[tokio::test]
async fn road_route_returns_coordinates() {
    let server = create_test_server(Backend::Routes);

    let response = server
        .post("/api/route")
        .json(&json!({
            "origin": {"lat": 45.0703, "lon": 7.6869},
            "destination": {"lat": 45.0623, "lon": 7.6625}
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["coordinates"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["coordinates"][1]["lon"], 7.6625);
}

#[tokio::test]
async fn road_route_without_path_is_not_found() {
    let server = create_test_server(Backend::Routes);
    let point = json!({"lat": 45.0703, "lon": 7.6869});

    let response = server
        .post("/api/route")
        .json(&json!({"origin": point, "destination": point}))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn road_route_rejects_out_of_range_points() {
    let server = create_test_server(Backend::Routes);

    let response = server
        .post("/api/route")
        .json(&json!({
            "origin": {"lat": 45.0, "lon": 200.0},
            "destination": {"lat": 45.1, "lon": 7.6}
        }))
        .await;

    response.assert_status_bad_request();
}

// ============ Geocoding Tests ============

#[tokio::test]
async fn search_returns_places_with_cache_header() {
    let server = create_test_server(Backend::Routes);

    let response = server
        .get("/api/nominatim/search")
        .add_query_param("q", "porta nuova")
        .add_query_param("limit", "2")
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.header("cache-control"),
        "public, s-maxage=3600, stale-while-revalidate=86400"
    );
    let body: serde_json::Value = response.json();
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    assert_eq!(body[0]["type"], "station");
}

#[tokio::test]
async fn search_requires_query() {
    let server = create_test_server(Backend::Routes);

    let response = server.get("/api/nominatim/search").await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Query parameter is required");
}

#[tokio::test]
async fn reverse_returns_place() {
    let server = create_test_server(Backend::Routes);

    let response = server
        .get("/api/nominatim/reverse")
        .add_query_param("lat", "45.07")
        .add_query_param("lon", "7.68")
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["display_name"], "Via Roma, Torino");
    assert!(response.headers().get("cache-control").is_some());
}

#[tokio::test]
async fn reverse_requires_numeric_coordinates() {
    let server = create_test_server(Backend::Routes);

    let missing = server
        .get("/api/nominatim/reverse")
        .add_query_param("lat", "45.07")
        .await;
    missing.assert_status_bad_request();

    let garbage = server
        .get("/api/nominatim/reverse")
        .add_query_param("lat", "north")
        .add_query_param("lon", "7.68")
        .await;
    garbage.assert_status_bad_request();
    let body: serde_json::Value = garbage.json();
    assert_eq!(body["error"], "Invalid latitude or longitude values");
}

#[tokio::test]
async fn reverse_miss_is_not_found() {
    let server = create_test_server(Backend::Routes);

    let response = server
        .get("/api/nominatim/reverse")
        .add_query_param("lat", "85.0")
        .add_query_param("lon", "0.0")
        .await;

    response.assert_status_not_found();
}
