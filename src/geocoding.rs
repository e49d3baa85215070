//! Place-name lookups against a Nominatim-compatible service
//!
//! Used by the HTTP and CLI surfaces to turn a typed place into a coordinate
//! and back. The estimation engine never geocodes.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use crate::cache::Cache;
use crate::config::SourcesConfig;
use crate::models::Coordinate;
use crate::weather::http_client;
use crate::{Result, WeatherWiseError};

/// Nominatim's usage policy allows one request per second
const MIN_REQUEST_INTERVAL: Duration = Duration::from_secs(1);

/// Enforces a minimum spacing between successive requests.
///
/// The lock is held while waiting, so concurrent callers queue up in order
/// instead of failing.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Waits until a request may be issued and records it.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let ready_at = previous + self.min_interval;
            if ready_at > Instant::now() {
                debug!(
                    "Rate limit reached, waiting {:.2}s",
                    (ready_at - Instant::now()).as_secs_f64()
                );
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(MIN_REQUEST_INTERVAL)
    }
}

/// Best match for a forward lookup
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GeocodedPlace {
    pub latitude: f64,
    pub longitude: f64,
    /// Full display name, e.g. "London, Greater London, England, United Kingdom"
    pub name: String,
    /// Structured address as returned by the service
    pub address: Option<serde_json::Value>,
}

impl GeocodedPlace {
    /// Validated coordinate of this place
    pub fn coordinate(&self) -> Result<Coordinate> {
        Coordinate::new(self.latitude, self.longitude)
    }
}

pub struct GeocodingClient {
    client: reqwest::Client,
    base_url: String,
    limiter: RateLimiter,
    places: Cache<GeocodedPlace>,
    names: Cache<String>,
}

impl GeocodingClient {
    pub fn new(config: &SourcesConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config.timeout_seconds)?,
            base_url: config.geocoding_base_url.trim_end_matches('/').to_string(),
            limiter: RateLimiter::default(),
            places: Cache::unbounded(),
            names: Cache::unbounded(),
        })
    }

    /// Coordinate and display name for `query`.
    ///
    /// Fails with `InvalidInput` when the service knows no such place and with
    /// `Transport` when it cannot be reached.
    #[instrument(skip(self))]
    pub async fn geocode(&self, query: &str) -> Result<GeocodedPlace> {
        let query = query.trim();
        if query.is_empty() {
            return Err(WeatherWiseError::invalid_input("Location query is empty"));
        }

        let key = format!("geocode:{}", query.to_lowercase());
        if let Some(place) = self.places.get(&key).await {
            return Ok(place);
        }

        let place = match self.search(query).await {
            Ok(Some(place)) => place,
            Ok(None) => {
                debug!("No match for '{}'", query);
                return Err(unable_to_find(query));
            }
            Err(err) => {
                warn!("Geocoding '{}' failed: {}", query, err);
                return Err(WeatherWiseError::transport(format!(
                    "Unable to find location: {query}"
                )));
            }
        };

        self.places.put(&key, place.clone()).await;
        Ok(place)
    }

    /// Display name for `coordinate`, or `"lat, lon"` when the lookup fails.
    #[instrument(skip(self, coordinate), fields(lat = coordinate.latitude(), lon = coordinate.longitude()))]
    pub async fn reverse(&self, coordinate: Coordinate) -> String {
        let key = format!("reverse:{}", coordinate.format_coordinates());
        if let Some(name) = self.names.get(&key).await {
            return name;
        }

        match self.lookup(coordinate).await {
            Ok(name) => {
                let name = name.unwrap_or_else(|| coordinate.format_coordinates());
                self.names.put(&key, name.clone()).await;
                name
            }
            Err(err) => {
                warn!("Reverse geocoding failed: {}", err);
                coordinate.format_coordinates()
            }
        }
    }

    async fn search(&self, query: &str) -> Result<Option<GeocodedPlace>> {
        let url = search_url(&self.base_url, query);
        let places: Vec<NominatimPlace> = self.fetch(&url).await?;
        places
            .into_iter()
            .next()
            .map(NominatimPlace::into_place)
            .transpose()
    }

    async fn lookup(&self, coordinate: Coordinate) -> Result<Option<String>> {
        let url = reverse_url(&self.base_url, coordinate);
        let body: NominatimReverse = self.fetch(&url).await?;
        Ok(body.display_name)
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.limiter.acquire().await;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WeatherWiseError::transport(format!(
                "Geocoding API error: {status}"
            )));
        }
        Ok(response.json().await?)
    }
}

fn unable_to_find(query: &str) -> WeatherWiseError {
    WeatherWiseError::invalid_input(format!("Unable to find location: {query}"))
}

fn search_url(base_url: &str, query: &str) -> String {
    format!(
        "{base_url}/search?format=json&q={}&limit=1&addressdetails=1",
        urlencoding::encode(query)
    )
}

fn reverse_url(base_url: &str, coordinate: Coordinate) -> String {
    format!(
        "{base_url}/reverse?format=json&lat={}&lon={}&zoom=10&addressdetails=1",
        coordinate.latitude(),
        coordinate.longitude()
    )
}

/// Nominatim reports coordinates as strings
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
    address: Option<serde_json::Value>,
}

impl NominatimPlace {
    fn into_place(self) -> Result<GeocodedPlace> {
        let parse = |value: &str, field: &str| {
            value
                .parse::<f64>()
                .map_err(|_| WeatherWiseError::malformed(format!("invalid {field} '{value}'")))
        };
        Ok(GeocodedPlace {
            latitude: parse(&self.lat, "lat")?,
            longitude: parse(&self.lon, "lon")?,
            name: self.display_name,
            address: self.address,
        })
    }
}

#[derive(Debug, Deserialize)]
struct NominatimReverse {
    display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_spaces_requests() {
        let limiter = RateLimiter::default();
        let start = Instant::now();

        limiter.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);

        limiter.acquire().await;
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_queues_concurrent_callers() {
        let limiter = &RateLimiter::default();
        let start = Instant::now();

        let stamp = move || async move {
            limiter.acquire().await;
            start.elapsed()
        };
        let (a, b, c) = tokio::join!(stamp(), stamp(), stamp());

        let mut waits = [a, b, c];
        waits.sort();
        assert_eq!(waits[0], Duration::ZERO);
        assert!(waits[1] >= Duration::from_secs(1));
        assert!(waits[2] >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_does_not_wait_after_idle() {
        let limiter = RateLimiter::default();
        limiter.acquire().await;
        tokio::time::advance(Duration::from_secs(5)).await;

        let before = Instant::now();
        limiter.acquire().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_search_url_encodes_query() {
        let url = search_url("https://nominatim.openstreetmap.org", "São Paulo, BR");
        assert_eq!(
            url,
            "https://nominatim.openstreetmap.org/search?format=json&q=S%C3%A3o%20Paulo%2C%20BR&limit=1&addressdetails=1"
        );
    }

    #[test]
    fn test_reverse_url() {
        let coordinate = Coordinate::new(51.5, -0.12).unwrap();
        let url = reverse_url("https://geo.example", coordinate);
        assert_eq!(
            url,
            "https://geo.example/reverse?format=json&lat=51.5&lon=-0.12&zoom=10&addressdetails=1"
        );
    }

    #[test]
    fn test_parse_search_results() {
        let body = r#"[{"place_id":1,"lat":"51.5073219","lon":"-0.1276474",
            "display_name":"London, Greater London, England, United Kingdom",
            "address":{"city":"London","country_code":"gb"}}]"#;
        let places: Vec<NominatimPlace> = serde_json::from_str(body).unwrap();
        let place = places.into_iter().next().unwrap().into_place().unwrap();

        assert!((place.latitude - 51.507_321_9).abs() < 1e-9);
        assert!(place.name.starts_with("London"));
        assert!(place.coordinate().is_ok());
        assert_eq!(place.address.unwrap()["country_code"], "gb");
    }

    #[test]
    fn test_unparseable_coordinates_are_malformed() {
        let place = NominatimPlace {
            lat: "north".to_string(),
            lon: "0".to_string(),
            display_name: "Nowhere".to_string(),
            address: None,
        };
        assert!(matches!(
            place.into_place(),
            Err(WeatherWiseError::MalformedResponse { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_query_is_invalid_input() {
        let client = GeocodingClient::new(&SourcesConfig::default()).unwrap();
        let err = client.geocode("   ").await.unwrap_err();
        assert!(matches!(err, WeatherWiseError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_service_degrades() {
        let config = SourcesConfig {
            geocoding_base_url: "http://127.0.0.1:9".to_string(),
            timeout_seconds: 2,
            ..SourcesConfig::default()
        };
        let client = GeocodingClient::new(&config).unwrap();
        let coordinate = Coordinate::new(46.8182, 8.2275).unwrap();

        assert_eq!(client.reverse(coordinate).await, "46.8182, 8.2275");

        let err = client.geocode("Zurich").await.unwrap_err();
        assert!(matches!(err, WeatherWiseError::Transport { .. }));
        assert!(err.is_environmental());
        assert!(err.to_string().contains("Unable to find location: Zurich"));
    }
}
