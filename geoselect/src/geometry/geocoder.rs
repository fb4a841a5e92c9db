//! Geocoding provider abstraction and the Google Geocoding API implementation.
//!
//! # API Endpoint
//!
//! - Reverse: `https://maps.googleapis.com/maps/api/geocode/json?latlng={lat},{lng}&key={API_KEY}`
//! - Forward: `https://maps.googleapis.com/maps/api/geocode/json?address={query}&key={API_KEY}`
//!
//! The `status` field of the response distinguishes success (`OK`) from
//! "nothing here" (`ZERO_RESULTS`) and provider failures (anything else).

use std::future::Future;

use serde::Deserialize;
use tracing::debug;

use super::types::{AddressComponent, GeocodeError, LatLng};
use crate::http::AsyncHttpClient;

/// Default Google Geocoding API endpoint.
pub const GOOGLE_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Reverse and forward geocoding.
pub trait Geocoder: Send + Sync {
    /// Resolve a point to its administrative component hierarchy.
    ///
    /// Components from all results are returned most-specific first.
    fn reverse(
        &self,
        point: LatLng,
    ) -> impl Future<Output = Result<Vec<AddressComponent>, GeocodeError>> + Send;

    /// Resolve a free-text query to a coordinate.
    fn forward(&self, query: &str) -> impl Future<Output = Result<LatLng, GeocodeError>> + Send;
}

#[derive(Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResultJson>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct GeocodeResultJson {
    #[serde(default)]
    address_components: Vec<AddressComponent>,
    geometry: Option<GeometryJson>,
}

#[derive(Deserialize)]
struct GeometryJson {
    location: LatLng,
}

fn parse_response(body: &[u8]) -> Result<Vec<GeocodeResultJson>, GeocodeError> {
    let response: GeocodeResponse = serde_json::from_slice(body)
        .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

    match response.status.as_str() {
        "OK" if !response.results.is_empty() => Ok(response.results),
        "OK" | "ZERO_RESULTS" => Err(GeocodeError::NoResults),
        _ => Err(GeocodeError::Status {
            status: response.status,
            message: response.error_message.unwrap_or_default(),
        }),
    }
}

/// Geocoder backed by the Google Geocoding API.
pub struct GoogleGeocoder<C: AsyncHttpClient> {
    http_client: C,
    api_key: String,
    endpoint: String,
}

impl<C: AsyncHttpClient> GoogleGeocoder<C> {
    pub fn new(http_client: C, api_key: impl Into<String>) -> Self {
        Self::with_endpoint(http_client, api_key, GOOGLE_GEOCODE_URL)
    }

    /// Use a different endpoint (e.g. a proxy or test server).
    pub fn with_endpoint(
        http_client: C,
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    fn build_url(&self, params: &[(&str, &str)]) -> Result<String, GeocodeError> {
        let mut all: Vec<(&str, &str)> = params.to_vec();
        all.push(("key", self.api_key.as_str()));
        reqwest::Url::parse_with_params(&self.endpoint, &all)
            .map(String::from)
            .map_err(|e| GeocodeError::InvalidResponse(format!("Bad geocoder endpoint: {}", e)))
    }
}

impl<C: AsyncHttpClient> Geocoder for GoogleGeocoder<C> {
    async fn reverse(&self, point: LatLng) -> Result<Vec<AddressComponent>, GeocodeError> {
        let latlng = format!("{},{}", point.lat, point.lng);
        let url = self.build_url(&[("latlng", &latlng)])?;
        let body = self.http_client.get(&url).await?;
        let results = parse_response(&body)?;

        debug!(point = %point, results = results.len(), "Reverse geocode complete");

        Ok(results
            .into_iter()
            .flat_map(|r| r.address_components)
            .collect())
    }

    async fn forward(&self, query: &str) -> Result<LatLng, GeocodeError> {
        let url = self.build_url(&[("address", query)])?;
        let body = self.http_client.get(&url).await?;
        let results = parse_response(&body)?;

        let location = results
            .into_iter()
            .find_map(|r| r.geometry)
            .map(|g| g.location)
            .ok_or_else(|| GeocodeError::InvalidResponse("result has no geometry".to_string()))?;

        debug!(query = query, location = %location, "Forward geocode complete");
        Ok(location)
    }
}
