//! Geometry provider adapter: boundary polygons and geocoding.
//!
//! The external map/geocoding service is consumed through two seams:
//!
//! - [`AsyncHttpClient`](crate::http::AsyncHttpClient) for the boundary dataset
//! - [`Geocoder`] for reverse and forward geocoding
//!
//! [`GeometryAdapter`] combines them into the operations the overlay
//! synchronizer uses.

mod adapter;
mod boundaries;
mod geocoder;
mod types;

pub use adapter::{
    county_label, county_label_from_components, county_marker_query, state_code_from_components,
    Boundaries, GeometryAdapter, HitTest,
};
pub use boundaries::{parse_boundaries, reconcile_codes, BoundaryFeature, DEFAULT_BOUNDARY_URL};
pub use geocoder::{Geocoder, GoogleGeocoder, GOOGLE_GEOCODE_URL};
pub use types::{
    AddressComponent, BoundaryError, GeocodeError, LatLng, ResolveError, COUNTY_COMPONENT,
    STATE_COMPONENT,
};

#[cfg(test)]
pub(crate) use adapter::tests::{component, StaticGeocoder, BOUNDARY_URL};
#[cfg(test)]
pub(crate) use boundaries::tests::TEST_BOUNDARIES;
