//! Nominatim (OpenStreetMap) geocoding client.
//!
//! Nominatim's public usage policy requires:
//! - User-Agent header identifying the application
//! - Rate limiting: at most 1 request per second

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::config::GeocoderConfig;
use crate::metrics;

use super::geocoder::{Address, GeocodeError, Geocoder};
use super::types::Coordinate;

/// Nominatim API client.
pub struct NominatimClient {
    client: Client,
    base_url: String,
    country: Option<String>,
    last_request: Arc<Mutex<Option<Instant>>>,
    rate_limit: Duration,
}

impl NominatimClient {
    /// Create a new Nominatim client.
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            country: config
                .country
                .as_ref()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            last_request: Arc::new(Mutex::new(None)),
            rate_limit: Duration::from_millis(config.rate_limit_ms),
        })
    }

    /// Wait for rate limit if needed.
    async fn wait_for_rate_limit(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.rate_limit {
                let wait_time = self.rate_limit - elapsed;
                debug!("Nominatim rate limit: waiting {:?}", wait_time);
                sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }

    fn build_search_url(&self, query: &str) -> String {
        let mut url = format!(
            "{}/search?city={}",
            self.base_url,
            urlencoding::encode(query)
        );
        if let Some(country) = &self.country {
            url.push_str(&format!("&country={}", urlencoding::encode(country)));
        }
        url.push_str("&format=json");
        url
    }

    fn build_reverse_url(&self, coordinate: Coordinate) -> String {
        format!(
            "{}/reverse?lat={}&lon={}&format=json",
            self.base_url,
            coordinate.latitude(),
            coordinate.longitude()
        )
    }

    async fn get(&self, url: &str, operation: &str) -> Result<reqwest::Response, GeocodeError> {
        self.wait_for_rate_limit().await;

        let started = std::time::Instant::now();
        let response = self.client.get(url).send().await;
        metrics::EXTERNAL_SERVICE_DURATION
            .with_label_values(&["nominatim", operation])
            .observe(started.elapsed().as_secs_f64());
        let response = response?;

        let status = response.status();
        if status == 429 {
            warn!("Nominatim rate limit exceeded");
            return Err(GeocodeError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response)
    }

    async fn reverse_inner(&self, coordinate: Coordinate) -> Result<Address, GeocodeError> {
        debug!(%coordinate, "Nominatim reverse lookup");

        let response = self.get(&self.build_reverse_url(coordinate), "reverse").await?;
        let body: NmReverseResponse = response.json().await.map_err(|e| {
            GeocodeError::ParseError(format!("Failed to parse reverse response: {}", e))
        })?;

        if let Some(error) = body.error {
            debug!("Nominatim reverse returned error body: {}", error);
        }

        Ok(body.address.unwrap_or_default().into())
    }

    async fn search_inner(&self, query: &str) -> Result<Vec<Coordinate>, GeocodeError> {
        debug!("Nominatim search: query='{}'", query);

        let response = self.get(&self.build_search_url(query), "search").await?;
        let places: Vec<NmPlace> = response.json().await.map_err(|e| {
            GeocodeError::ParseError(format!("Failed to parse search response: {}", e))
        })?;

        into_candidates(places)
    }
}

/// The first place is authoritative and must parse; later ones are kept
/// only when they do.
fn into_candidates(places: Vec<NmPlace>) -> Result<Vec<Coordinate>, GeocodeError> {
    let mut places = places.into_iter();
    let Some(first) = places.next() else {
        return Ok(Vec::new());
    };

    let mut candidates = vec![first.into_coordinate()?];
    for place in places {
        match place.into_coordinate() {
            Ok(coordinate) => candidates.push(coordinate),
            Err(e) => debug!("Skipping search candidate: {}", e),
        }
    }
    Ok(candidates)
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn reverse(&self, coordinate: Coordinate) -> Result<Address, GeocodeError> {
        let result = self.reverse_inner(coordinate).await;
        let label = if result.is_ok() { "ok" } else { "error" };
        metrics::GEOCODE_REQUESTS
            .with_label_values(&["reverse", label])
            .inc();
        result
    }

    async fn search(&self, query: &str) -> Result<Vec<Coordinate>, GeocodeError> {
        let result = self.search_inner(query).await;
        let label = if result.is_ok() { "ok" } else { "error" };
        metrics::GEOCODE_REQUESTS
            .with_label_values(&["forward", label])
            .inc();
        result
    }
}

// ============================================================================
// Nominatim API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct NmReverseResponse {
    #[serde(default)]
    address: Option<NmAddress>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct NmAddress {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    town: Option<String>,
    #[serde(default)]
    village: Option<String>,
}

impl From<NmAddress> for Address {
    fn from(nm: NmAddress) -> Self {
        Address {
            city: nm.city,
            town: nm.town,
            village: nm.village,
        }
    }
}

/// Nominatim returns coordinates as decimal strings.
#[derive(Debug, Deserialize)]
struct NmPlace {
    lat: String,
    lon: String,
}

impl NmPlace {
    fn into_coordinate(self) -> Result<Coordinate, GeocodeError> {
        let lat: f64 = self
            .lat
            .parse()
            .map_err(|_| GeocodeError::ParseError(format!("invalid latitude '{}'", self.lat)))?;
        let lon: f64 = self
            .lon
            .parse()
            .map_err(|_| GeocodeError::ParseError(format!("invalid longitude '{}'", self.lon)))?;
        Coordinate::new(lat, lon).map_err(|e| GeocodeError::ParseError(e.to_string()))
    }
}
