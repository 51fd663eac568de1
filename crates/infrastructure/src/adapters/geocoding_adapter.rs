//! Geocoding adapter - Implements GeocodingPort using Nominatim

use std::sync::Arc;

use application::ApplicationError;
use application::ports::{GeocodingPort, Place};
use async_trait::async_trait;
use domain::Coordinate;
use integration_transit::{GeocodedPlace, GeocodingClient};
use tracing::{debug, instrument};

use super::map_upstream_error;

const SERVICE: &str = "nominatim";

/// Adapter for Nominatim geocoding
///
/// No retries: Nominatim's usage policy asks for at most one request per second,
/// and the client already caches answers.
pub struct GeocodingAdapter {
    client: Arc<dyn GeocodingClient>,
}

impl std::fmt::Debug for GeocodingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingAdapter").finish_non_exhaustive()
    }
}

impl GeocodingAdapter {
    /// Create a new adapter around a geocoding client
    #[must_use]
    pub fn new(client: Arc<dyn GeocodingClient>) -> Self {
        Self { client }
    }
}

fn to_place(place: GeocodedPlace) -> Place {
    Place {
        display_name: place.display_name,
        lat: place.lat,
        lon: place.lon,
        category: place.category,
        place_type: place.place_type,
        importance: place.importance,
    }
}

#[async_trait]
impl GeocodingPort for GeocodingAdapter {
    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: u8) -> Result<Vec<Place>, ApplicationError> {
        let places = self
            .client
            .search(query, limit)
            .await
            .map_err(|e| map_upstream_error(SERVICE, e))?;

        debug!(count = places.len(), "Geocoding search done");
        Ok(places.into_iter().map(to_place).collect())
    }

    #[instrument(skip(self))]
    async fn reverse(&self, coordinate: Coordinate) -> Result<Place, ApplicationError> {
        self.client
            .reverse(coordinate.lat, coordinate.lon)
            .await
            .map(to_place)
            .map_err(|e| map_upstream_error(SERVICE, e))
    }
}

#[cfg(test)]
mod tests {
    use integration_transit::UpstreamError;

    use super::*;

    struct StubGeocoder;

    #[async_trait]
    impl GeocodingClient for StubGeocoder {
        async fn search(
            &self,
            query: &str,
            limit: u8,
        ) -> Result<Vec<GeocodedPlace>, UpstreamError> {
            if query == "busy" {
                return Err(UpstreamError::RateLimited {
                    retry_after_secs: None,
                });
            }
            Ok((0..limit.min(2))
                .map(|i| GeocodedPlace {
                    display_name: format!("{query} {i}"),
                    lat: 45.0 + f64::from(i),
                    lon: 7.6,
                    category: Some("highway".to_string()),
                    place_type: Some("bus_stop".to_string()),
                    importance: Some(0.4),
                })
                .collect())
        }

        async fn reverse(
            &self,
            latitude: f64,
            longitude: f64,
        ) -> Result<GeocodedPlace, UpstreamError> {
            if latitude > 80.0 {
                return Err(UpstreamError::NotFound("Unable to geocode".to_string()));
            }
            Ok(GeocodedPlace {
                display_name: "Via Roma, Torino".to_string(),
                lat: latitude,
                lon: longitude,
                category: None,
                place_type: None,
                importance: None,
            })
        }
    }

    fn adapter() -> GeocodingAdapter {
        GeocodingAdapter::new(Arc::new(StubGeocoder))
    }

    #[tokio::test]
    async fn search_maps_places() {
        let places = adapter().search("Porta Nuova", 5).await.unwrap();
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].display_name, "Porta Nuova 0");
        assert_eq!(places[1].place_type.as_deref(), Some("bus_stop"));
        assert_eq!(places[1].coordinate(), Coordinate::new(46.0, 7.6));
    }

    #[tokio::test]
    async fn search_rate_limit_is_reported() {
        let err = adapter().search("busy", 5).await.unwrap_err();
        assert!(matches!(err, ApplicationError::RateLimited));
    }

    #[tokio::test]
    async fn reverse_maps_place() {
        let place = adapter().reverse(Coordinate::new(45.07, 7.68)).await.unwrap();
        assert_eq!(place.display_name, "Via Roma, Torino");
        assert!(place.category.is_none());
    }

    #[tokio::test]
    async fn reverse_miss_is_not_found() {
        let err = adapter().reverse(Coordinate::new(85.0, 0.0)).await.unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound(_)));
    }
}
