//! Geometry and geocoding types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::http::HttpError;
use crate::region::Level;

/// A WGS84 coordinate as delivered by map clicks and geocoder responses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns true if latitude and longitude are within WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    /// As a `geo` point (x = longitude, y = latitude).
    pub fn to_point(self) -> geo::Point<f64> {
        geo::Point::new(self.lng, self.lat)
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.lat, self.lng)
    }
}

/// One entry of a geocoder's administrative component hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl AddressComponent {
    pub fn has_type(&self, kind: &str) -> bool {
        self.types.iter().any(|t| t == kind)
    }
}

/// Component type holding the state.
pub const STATE_COMPONENT: &str = "administrative_area_level_1";
/// Component type holding the county.
pub const COUNTY_COMPONENT: &str = "administrative_area_level_2";

/// Errors from the geocoding provider.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeocodeError {
    /// Transport failure
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Provider answered but reported no match
    #[error("No results")]
    NoResults,

    /// Provider reported a failure status (e.g. REQUEST_DENIED)
    #[error("Geocoder returned {status}: {message}")]
    Status { status: String, message: String },

    /// Response body was not understood
    #[error("Invalid geocoder response: {0}")]
    InvalidResponse(String),
}

/// Errors from boundary dataset loading.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundaryError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Invalid boundary data: {0}")]
    Parse(String),

    #[error("Boundary data is not a FeatureCollection")]
    NotFeatureCollection,
}

/// Why a point could not be turned into a code.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    /// The reverse geocode itself failed
    #[error("Location lookup failed: {0}")]
    Lookup(#[from] GeocodeError),

    /// The geocoder returned nothing usable for this level
    #[error("No {level} found at this location")]
    Unresolvable { level: Level },

    /// A county was found but is not in the demo table
    #[error("{label} is outside the county demo data")]
    NotCovered { label: String },
}
