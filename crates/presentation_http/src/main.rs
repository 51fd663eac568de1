//! Wayline HTTP Server
//!
//! Main entry point for the HTTP API server.

use std::{sync::Arc, time::Duration};

use application::TripPlanningService;
use infrastructure::{
    AppConfig, GeocodingAdapter, RoadRoutingAdapter, TripPlannerAdapter, init_logging,
};
use integration_transit::{HttpTripPlannerClient, NominatimGeocodingClient, ValhallaClient};
use presentation_http::{routes, set_expose_internal_errors, state::AppState};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

const DEFAULT_LOG_FILTER: &str = "wayline_server=debug,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration before logging so the log format can be honored
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_logging(config.server.log_format, DEFAULT_LOG_FILTER)?;

    info!("Wayline v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(e) = load_error {
        warn!("Failed to load config, using defaults: {}", e);
    }

    if let Err(errors) = config.validate() {
        for error in &errors {
            tracing::error!(%error, "Invalid configuration");
        }
        anyhow::bail!("{} configuration error(s)", errors.len());
    }

    set_expose_internal_errors(!config.is_production());

    info!(
        host = %config.server.host,
        port = %config.server.port,
        environment = %config.environment(),
        trip_planner = %config.trip_planner.base_url,
        "Configuration loaded"
    );

    // Upstream clients and adapters
    let trip_client = HttpTripPlannerClient::new(&config.trip_planner)
        .map_err(|e| anyhow::anyhow!("Failed to initialize trip planner client: {e}"))?;
    let valhalla_client = ValhallaClient::new(&config.valhalla)
        .map_err(|e| anyhow::anyhow!("Failed to initialize Valhalla client: {e}"))?;
    let geocoding_client = NominatimGeocodingClient::new(&config.geocoding)
        .map_err(|e| anyhow::anyhow!("Failed to initialize geocoding client: {e}"))?;

    let trip_planner =
        TripPlannerAdapter::new(Arc::new(trip_client)).with_retry(config.retry.clone());
    let road_routing =
        RoadRoutingAdapter::new(Arc::new(valhalla_client)).with_retry(config.retry.clone());

    let trip_service = TripPlanningService::new(Arc::new(trip_planner))
        .with_road_routing(Arc::new(road_routing))
        .with_fallback_policy(config.planning.fallback_policy());

    let state = AppState {
        trip_service: Arc::new(trip_service),
        geocoding: Arc::new(GeocodingAdapter::new(Arc::new(geocoding_client))),
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = routes::create_router(state);

    // Configure CORS layer
    let cors_layer = if config.server.allowed_origins.is_empty() {
        // Development mode: allow all origins
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production mode: restrict to configured origins
        use axum::http::{HeaderValue, Method};
        let origins: Vec<HeaderValue> = config
            .server
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any)
    };

    // Add middleware (order matters: last added = outermost)
    let app = app
        .layer(RequestBodyLimitLayer::new(
            config.server.max_body_size_json_bytes,
        ))
        .layer(TraceLayer::new_for_http());
    let app = if config.server.cors_enabled {
        app.layer(cors_layer)
    } else {
        app
    };

    // Start server
    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server listening on http://{}", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("Waiting up to {:?} for connections to close...", timeout);
}
