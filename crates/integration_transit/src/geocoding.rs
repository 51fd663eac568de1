//! Nominatim geocoding client
//!
//! Forward search and reverse lookup against the
//! [Nominatim](https://nominatim.openstreetmap.org) API (OpenStreetMap).
//!
//! Implements rate limiting (max 1 request/second per Nominatim usage policy)
//! and result caching to minimize API calls.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::error::UpstreamError;

/// Configuration for the Nominatim geocoding service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NominatimConfig {
    /// Base URL for the Nominatim API
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,

    /// Connection timeout in seconds
    #[serde(default = "default_geocoding_timeout_secs")]
    pub timeout_secs: u64,

    /// Cache TTL in hours (0 to disable)
    #[serde(default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: u64,

    /// Country code filter (e.g., "it"), empty for worldwide
    #[serde(default)]
    pub country_filter: String,

    /// Preferred result language
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// Minimum spacing between requests in milliseconds
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,
}

fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

const fn default_geocoding_timeout_secs() -> u64 {
    5
}

const fn default_cache_ttl_hours() -> u64 {
    24
}

fn default_accept_language() -> String {
    "en".to_string()
}

const fn default_min_request_interval_ms() -> u64 {
    1100
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            timeout_secs: default_geocoding_timeout_secs(),
            cache_ttl_hours: default_cache_ttl_hours(),
            country_filter: String::new(),
            accept_language: default_accept_language(),
            min_request_interval_ms: default_min_request_interval_ms(),
        }
    }
}

impl NominatimConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            cache_ttl_hours: 0,
            min_request_interval_ms: 0,
            ..Default::default()
        }
    }

    /// Check if caching is enabled
    #[must_use]
    pub const fn caching_enabled(&self) -> bool {
        self.cache_ttl_hours > 0
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if url::Url::parse(&self.base_url).is_err() {
            return Err(format!("base_url is not a valid URL: {}", self.base_url));
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}

/// A place as returned by the geocoder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedPlace {
    /// Human-readable address
    pub display_name: String,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Feature class
    pub category: Option<String>,
    /// Feature type
    pub place_type: Option<String>,
    /// Relevance score
    pub importance: Option<f64>,
}

/// Trait for geocoding clients
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Places matching a free-text query, best match first
    async fn search(&self, query: &str, limit: u8) -> Result<Vec<GeocodedPlace>, UpstreamError>;

    /// Place at the given coordinates
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<GeocodedPlace, UpstreamError>;
}

/// Result caches, present only when caching is enabled
#[derive(Debug)]
struct PlaceCache {
    search: Cache<String, Vec<GeocodedPlace>>,
    reverse: Cache<String, GeocodedPlace>,
}

impl PlaceCache {
    fn new(ttl: Duration) -> Self {
        Self {
            search: Cache::builder().max_capacity(1000).time_to_live(ttl).build(),
            reverse: Cache::builder().max_capacity(1000).time_to_live(ttl).build(),
        }
    }
}

/// Nominatim-based geocoding client with rate limiting and caching
#[derive(Debug)]
pub struct NominatimGeocodingClient {
    client: Client,
    config: NominatimConfig,
    cache: Option<PlaceCache>,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl NominatimGeocodingClient {
    /// Create a new Nominatim geocoding client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &NominatimConfig) -> Result<Self, UpstreamError> {
        config.validate().map_err(UpstreamError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("Wayline/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpstreamError::ConnectionFailed(e.to_string()))?;

        let cache = config
            .caching_enabled()
            .then(|| PlaceCache::new(Duration::from_secs(config.cache_ttl_hours * 3600)));

        Ok(Self {
            client,
            config: config.clone(),
            cache,
            last_request: Arc::new(Mutex::new(None)),
        })
    }

    /// Enforce Nominatim's rate limit
    async fn rate_limit(&self) {
        let interval = Duration::from_millis(self.config.min_request_interval_ms);
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < interval {
                let wait = interval.saturating_sub(elapsed);
                debug!(?wait, "Rate limiting geocoding request");
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn get(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<reqwest::Response, UpstreamError> {
        self.rate_limit().await;

        let url = format!("{}/{endpoint}", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .query(params)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(&e, self.config.timeout_secs))?;

        if !response.status().is_success() {
            return Err(UpstreamError::from_status(&response));
        }
        Ok(response)
    }
}

#[async_trait]
impl GeocodingClient for NominatimGeocodingClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: u8) -> Result<Vec<GeocodedPlace>, UpstreamError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(UpstreamError::NotFound("Query must not be empty".to_string()));
        }

        let cache_key = format!("{}|{limit}", query.to_lowercase());
        let cached = match &self.cache {
            Some(cache) => cache.search.get(&cache_key).await,
            None => None,
        };
        if let Some(places) = cached {
            debug!(%query, "Geocoding cache hit");
            return Ok(places);
        }

        let mut params = vec![
            ("q", query.to_string()),
            ("format", "jsonv2".to_string()),
            ("limit", limit.to_string()),
            ("accept-language", self.config.accept_language.clone()),
        ];
        if !self.config.country_filter.is_empty() {
            params.push(("countrycodes", self.config.country_filter.clone()));
        }

        debug!(%query, "Searching places");
        let results: Vec<NominatimResult> = self
            .get("search", &params)
            .await?
            .json()
            .await
            .map_err(|e| UpstreamError::Parse(e.to_string()))?;

        let places = results
            .into_iter()
            .map(NominatimResult::into_place)
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(cache) = &self.cache {
            cache.search.insert(cache_key, places.clone()).await;
        }
        debug!(count = places.len(), "Places found");
        Ok(places)
    }

    #[instrument(skip(self))]
    async fn reverse(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<GeocodedPlace, UpstreamError> {
        let cache_key = format!("{latitude:.6},{longitude:.6}");
        let cached = match &self.cache {
            Some(cache) => cache.reverse.get(&cache_key).await,
            None => None,
        };
        if let Some(place) = cached {
            debug!(%cache_key, "Reverse geocoding cache hit");
            return Ok(place);
        }

        let params = [
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("format", "jsonv2".to_string()),
            ("accept-language", self.config.accept_language.clone()),
        ];

        debug!(%latitude, %longitude, "Reverse geocoding");
        let result: NominatimReverse = self
            .get("reverse", &params)
            .await?
            .json()
            .await
            .map_err(|e| UpstreamError::Parse(e.to_string()))?;

        let place = match result {
            NominatimReverse::Found(raw) => raw.into_place()?,
            NominatimReverse::Error { error } => {
                debug!(%error, "Nominatim found nothing");
                return Err(UpstreamError::NotFound(format!("{latitude},{longitude}")));
            },
        };

        if let Some(cache) = &self.cache {
            cache.reverse.insert(cache_key, place.clone()).await;
        }
        Ok(place)
    }
}

/// Raw Nominatim place
#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default, alias = "class")]
    category: Option<String>,
    #[serde(default, rename = "type")]
    place_type: Option<String>,
    #[serde(default)]
    importance: Option<f64>,
}

impl NominatimResult {
    fn into_place(self) -> Result<GeocodedPlace, UpstreamError> {
        let lat: f64 = self
            .lat
            .parse()
            .map_err(|_| UpstreamError::Parse("Invalid latitude".to_string()))?;
        let lon: f64 = self
            .lon
            .parse()
            .map_err(|_| UpstreamError::Parse("Invalid longitude".to_string()))?;

        Ok(GeocodedPlace {
            display_name: self.display_name.unwrap_or_default(),
            lat,
            lon,
            category: self.category,
            place_type: self.place_type,
            importance: self.importance,
        })
    }
}

/// Reverse lookups answer 200 with an `error` field when nothing matches
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NominatimReverse {
    Found(NominatimResult),
    Error { error: String },
}
