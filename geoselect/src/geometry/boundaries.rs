//! State boundary polygons loaded from a GeoJSON FeatureCollection.

use geo::{Contains, MultiPolygon};
use geojson::GeoJson;
use tracing::{debug, warn};

use super::types::{BoundaryError, LatLng};
use crate::region::{state_code_for_name, Code};

/// Public US states dataset; each feature carries a `name` property.
pub const DEFAULT_BOUNDARY_URL: &str =
    "https://raw.githubusercontent.com/PublicaMundi/MappingAPI/master/data/geojson/us-states.json";

/// A named boundary polygon, optionally reconciled to a state code.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    pub name: String,
    /// `None` when the name has no entry in the state table. Such features are
    /// drawn but never selectable.
    pub code: Option<Code>,
    pub geometry: MultiPolygon<f64>,
}

impl BoundaryFeature {
    pub fn contains(&self, point: LatLng) -> bool {
        self.geometry.contains(&point.to_point())
    }
}

/// Parse a GeoJSON FeatureCollection into boundary features.
///
/// Features without a polygonal geometry are skipped. A missing `name`
/// property yields an empty name (and therefore no code).
pub fn parse_boundaries(data: &[u8]) -> Result<Vec<BoundaryFeature>, BoundaryError> {
    let geojson = GeoJson::from_reader(data).map_err(|e| BoundaryError::Parse(e.to_string()))?;

    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => return Err(BoundaryError::NotFeatureCollection),
    };

    let mut features = Vec::with_capacity(collection.features.len());
    for feature in collection.features {
        let name = feature
            .property("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let Some(geometry) = feature.geometry else {
            debug!(name = %name, "Skipping boundary feature without geometry");
            continue;
        };

        let geometry = match geo::Geometry::<f64>::try_from(geometry) {
            Ok(geo::Geometry::Polygon(polygon)) => MultiPolygon::new(vec![polygon]),
            Ok(geo::Geometry::MultiPolygon(multi)) => multi,
            Ok(_) => {
                debug!(name = %name, "Skipping non-polygonal boundary feature");
                continue;
            }
            Err(e) => {
                warn!(name = %name, error = %e, "Skipping unreadable boundary geometry");
                continue;
            }
        };

        features.push(BoundaryFeature {
            name,
            code: None,
            geometry,
        });
    }

    Ok(features)
}

/// Attach state codes to features by name.
///
/// Returns the number of features left without a code.
pub fn reconcile_codes(features: &mut [BoundaryFeature]) -> usize {
    let mut unmatched = 0;
    for feature in features.iter_mut() {
        feature.code = state_code_for_name(&feature.name);
        if feature.code.is_none() {
            unmatched += 1;
            debug!(name = %feature.name, "Boundary feature has no state code");
        }
    }
    unmatched
}
