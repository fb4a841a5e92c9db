//! Geometry provider adapter.
//!
//! Wraps the boundary dataset and the geocoder behind the operations the
//! overlay synchronizer needs:
//!
//! - [`load_boundaries`](GeometryAdapter::load_boundaries) - fetch once, memoize success
//! - [`resolve_point`](GeometryAdapter::resolve_point) - reverse geocode to a code
//! - [`locate_county`](GeometryAdapter::locate_county) - forward geocode a marker position
//! - [`hit_test`](GeometryAdapter::hit_test) - point-in-polygon over cached boundaries
//!
//! County resolution is an approximation: there are no county polygons, so
//! a click is reverse geocoded and the resulting county label is looked up
//! in the small demo table.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

use super::boundaries::{parse_boundaries, reconcile_codes, BoundaryFeature};
use super::geocoder::Geocoder;
use super::types::{
    AddressComponent, BoundaryError, GeocodeError, LatLng, ResolveError, COUNTY_COMPONENT,
    STATE_COMPONENT,
};
use crate::http::AsyncHttpClient;
use crate::notice::NoticeBoard;
use crate::region::{county_code_for_label, is_state_code, Code, Level};

/// Loaded boundary set, shared with overlay frames.
pub type Boundaries = Arc<Vec<BoundaryFeature>>;

/// Result of hit testing a point against loaded boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTest {
    /// Boundaries not loaded, or the point is outside every polygon.
    Miss,
    /// Inside a polygon whose name has no state code.
    Uncoded { name: String },
    /// Inside a selectable polygon.
    Feature { code: Code },
}

/// Suffixes that already name a county-equivalent unit.
const COUNTY_SUFFIXES: [&str; 3] = ["County", "Parish", "Borough"];

/// Build the `"<Name> County, <ST>"` lookup label.
///
/// " County" is appended unless the name already ends in County, Parish or Borough.
pub fn county_label(name: &str, state: &str) -> String {
    let name = name.trim();
    if COUNTY_SUFFIXES.iter().any(|s| name.ends_with(s)) {
        format!("{}, {}", name, state.trim())
    } else {
        format!("{} County, {}", name, state.trim())
    }
}

/// Extract a known state abbreviation from geocoder components.
pub fn state_code_from_components(components: &[AddressComponent]) -> Option<Code> {
    components
        .iter()
        .find(|c| c.has_type(STATE_COMPONENT))
        .map(|c| c.short_name.trim())
        .filter(|abbr| is_state_code(abbr))
        .map(Code::from)
}

/// Build the county lookup label from geocoder components.
pub fn county_label_from_components(components: &[AddressComponent]) -> Option<String> {
    let county = components.iter().find(|c| c.has_type(COUNTY_COMPONENT))?;
    let state = components.iter().find(|c| c.has_type(STATE_COMPONENT))?;
    Some(county_label(&county.long_name, &state.short_name))
}

/// Forward-geocoding query used to place a county marker.
pub fn county_marker_query(code: &Code) -> String {
    format!("FIPS {} county USA", code)
}

/// Adapter over the external boundary dataset and geocoding service.
pub struct GeometryAdapter<C: AsyncHttpClient, G: Geocoder> {
    http_client: C,
    geocoder: G,
    boundary_url: String,
    notices: NoticeBoard,
    /// Successfully loaded boundaries. Stays `None` after a failed load.
    boundaries: RwLock<Option<Boundaries>>,
    /// Serializes fetches so concurrent callers share one request.
    load_gate: AsyncMutex<()>,
}

impl<C: AsyncHttpClient, G: Geocoder> GeometryAdapter<C, G> {
    pub fn new(
        http_client: C,
        geocoder: G,
        boundary_url: impl Into<String>,
        notices: NoticeBoard,
    ) -> Self {
        Self {
            http_client,
            geocoder,
            boundary_url: boundary_url.into(),
            notices,
            boundaries: RwLock::new(None),
            load_gate: AsyncMutex::new(()),
        }
    }

    /// Boundaries already in memory, without fetching.
    pub fn cached_boundaries(&self) -> Option<Boundaries> {
        self.boundaries.read().clone()
    }

    /// Fetch boundary polygons once; later calls return the cached set.
    ///
    /// On failure a transient notice is posted and nothing is cached, so
    /// the next call retries.
    pub async fn load_boundaries(&self) -> Result<Boundaries, BoundaryError> {
        if let Some(cached) = self.cached_boundaries() {
            return Ok(cached);
        }

        let _gate = self.load_gate.lock().await;
        if let Some(cached) = self.cached_boundaries() {
            return Ok(cached);
        }

        match self.fetch_boundaries().await {
            Ok(features) => {
                let features: Boundaries = Arc::new(features);
                *self.boundaries.write() = Some(Arc::clone(&features));
                Ok(features)
            }
            Err(e) => {
                warn!(url = %self.boundary_url, error = %e, "Boundary load failed");
                self.notices
                    .post_transient("Could not load state boundaries. Try again shortly.");
                Err(e)
            }
        }
    }

    async fn fetch_boundaries(&self) -> Result<Vec<BoundaryFeature>, BoundaryError> {
        debug!(url = %self.boundary_url, "Fetching boundary dataset");
        let body = self.http_client.get(&self.boundary_url).await?;
        let mut features = parse_boundaries(&body)?;
        let unmatched = reconcile_codes(&mut features);
        info!(
            features = features.len(),
            unmatched = unmatched,
            "Boundary dataset loaded"
        );
        Ok(features)
    }

    /// Point-in-polygon test against cached boundaries. Never fetches.
    pub fn hit_test(&self, point: LatLng) -> HitTest {
        let Some(boundaries) = self.cached_boundaries() else {
            return HitTest::Miss;
        };

        match boundaries.iter().find(|f| f.contains(point)) {
            Some(BoundaryFeature {
                code: Some(code), ..
            }) => HitTest::Feature { code: code.clone() },
            Some(feature) => HitTest::Uncoded {
                name: feature.name.clone(),
            },
            None => HitTest::Miss,
        }
    }

    /// Reverse geocode `point` to a code at `level`.
    ///
    /// No retries. Any failure posts a transient notice.
    pub async fn resolve_point(&self, point: LatLng, level: Level) -> Result<Code, ResolveError> {
        let result = self.resolve_point_inner(point, level).await;
        match &result {
            Ok(code) => debug!(point = %point, level = %level, code = %code, "Point resolved"),
            Err(e) => {
                debug!(point = %point, level = %level, error = %e, "Point not resolved");
                self.notices.post_transient(resolve_notice(e));
            }
        }
        result
    }

    async fn resolve_point_inner(&self, point: LatLng, level: Level) -> Result<Code, ResolveError> {
        let components = match self.geocoder.reverse(point).await {
            Ok(components) => components,
            Err(GeocodeError::NoResults) => return Err(ResolveError::Unresolvable { level }),
            Err(e) => return Err(ResolveError::Lookup(e)),
        };

        match level {
            Level::State => {
                state_code_from_components(&components).ok_or(ResolveError::Unresolvable { level })
            }
            Level::County => {
                let label = county_label_from_components(&components)
                    .ok_or(ResolveError::Unresolvable { level })?;
                county_code_for_label(&label).ok_or(ResolveError::NotCovered { label })
            }
        }
    }

    /// Forward geocode a county marker position.
    ///
    /// Failures post a transient notice; the marker is simply not drawn.
    pub async fn locate_county(&self, code: &Code) -> Result<LatLng, GeocodeError> {
        let result = self.geocoder.forward(&county_marker_query(code)).await;
        if let Err(e) = &result {
            warn!(code = %code, error = %e, "County marker lookup failed");
            self.notices
                .post_transient(format!("Could not place a marker for county {}.", code));
        }
        result
    }
}

fn resolve_notice(error: &ResolveError) -> String {
    match error {
        ResolveError::Lookup(_) => "Location lookup failed. Try clicking again.".to_string(),
        ResolveError::Unresolvable { level } => format!("No {} found at that spot.", level),
        ResolveError::NotCovered { label } => format!(
            "{} is not in the demo county data yet (coverage is limited).",
            label
        ),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::geometry::boundaries::tests::TEST_BOUNDARIES;
    use crate::http::tests::MockAsyncHttpClient;
    use crate::http::HttpError;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    pub(crate) const BOUNDARY_URL: &str = "http://boundaries.test/us-states.json";

    pub(crate) fn component(long: &str, short: &str, kind: &str) -> AddressComponent {
        AddressComponent {
            long_name: long.to_string(),
            short_name: short.to_string(),
            types: vec![kind.to_string(), "political".to_string()],
        }
    }

    /// In-memory geocoder keyed by rounded coordinates and query strings.
    #[derive(Clone, Default)]
    pub(crate) struct StaticGeocoder {
        pub reverse: Arc<Mutex<HashMap<String, Result<Vec<AddressComponent>, GeocodeError>>>>,
        pub forward: Arc<Mutex<HashMap<String, Result<LatLng, GeocodeError>>>>,
        pub reverse_calls: Arc<Mutex<usize>>,
        pub forward_calls: Arc<Mutex<Vec<String>>>,
    }

    fn key(point: LatLng) -> String {
        format!("{:.2},{:.2}", point.lat, point.lng)
    }

    impl StaticGeocoder {
        pub fn with_reverse(
            self,
            point: LatLng,
            result: Result<Vec<AddressComponent>, GeocodeError>,
        ) -> Self {
            self.reverse.lock().insert(key(point), result);
            self
        }

        pub fn with_forward(self, query: &str, result: Result<LatLng, GeocodeError>) -> Self {
            self.forward.lock().insert(query.to_string(), result);
            self
        }

        pub fn reverse_calls(&self) -> usize {
            *self.reverse_calls.lock()
        }

        pub fn forward_calls(&self) -> Vec<String> {
            self.forward_calls.lock().clone()
        }
    }

    impl Geocoder for StaticGeocoder {
        async fn reverse(&self, point: LatLng) -> Result<Vec<AddressComponent>, GeocodeError> {
            *self.reverse_calls.lock() += 1;
            self.reverse
                .lock()
                .get(&key(point))
                .cloned()
                .unwrap_or(Err(GeocodeError::NoResults))
        }

        async fn forward(&self, query: &str) -> Result<LatLng, GeocodeError> {
            self.forward_calls.lock().push(query.to_string());
            self.forward
                .lock()
                .get(query)
                .cloned()
                .unwrap_or(Err(GeocodeError::NoResults))
        }
    }

    fn adapter(
        http: MockAsyncHttpClient,
        geocoder: StaticGeocoder,
    ) -> (GeometryAdapter<MockAsyncHttpClient, StaticGeocoder>, NoticeBoard) {
        let notices = NoticeBoard::new();
        (
            GeometryAdapter::new(http, geocoder, BOUNDARY_URL, notices.clone()),
            notices,
        )
    }

    #[test]
    fn test_county_label_suffixes() {
        assert_eq!(county_label("San Francisco", "CA"), "San Francisco County, CA");
        assert_eq!(county_label("Cook County", "IL"), "Cook County, IL");
        assert_eq!(county_label("Orleans Parish", "LA"), "Orleans Parish, LA");
        assert_eq!(
            county_label("Matanuska-Susitna Borough", "AK"),
            "Matanuska-Susitna Borough, AK"
        );
    }

    #[test]
    fn test_marker_query_format() {
        assert_eq!(county_marker_query(&Code::from("06075")), "FIPS 06075 county USA");
    }

    #[test]
    fn test_state_code_requires_known_abbreviation() {
        let ok = vec![component("California", "CA", STATE_COMPONENT)];
        assert_eq!(state_code_from_components(&ok), Some(Code::from("CA")));

        let foreign = vec![component("Ontario", "ON", STATE_COMPONENT)];
        assert_eq!(state_code_from_components(&foreign), None);
    }

    #[tokio::test]
    async fn test_load_boundaries_memoizes_success() {
        let http = MockAsyncHttpClient::new().on_get(BOUNDARY_URL, Ok(TEST_BOUNDARIES.into()));
        let (adapter, _) = adapter(http.clone(), StaticGeocoder::default());

        let first = adapter.load_boundaries().await.unwrap();
        let second = adapter.load_boundaries().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(http.request_count("GET", BOUNDARY_URL), 1);
    }

    #[tokio::test]
    async fn test_load_failure_posts_notice_and_allows_retry() {
        let http = MockAsyncHttpClient::new().on_get(
            BOUNDARY_URL,
            Err(HttpError::Request("connection refused".to_string())),
        );
        let (adapter, notices) = adapter(http.clone(), StaticGeocoder::default());

        assert!(adapter.load_boundaries().await.is_err());
        assert!(adapter.cached_boundaries().is_none());
        assert!(notices.current().is_some());

        http.set_route("GET", BOUNDARY_URL, Ok(TEST_BOUNDARIES.into()));
        let loaded = adapter.load_boundaries().await.unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(http.request_count("GET", BOUNDARY_URL), 2);
    }

    #[tokio::test]
    async fn test_hit_test_before_and_after_load() {
        let http = MockAsyncHttpClient::new().on_get(BOUNDARY_URL, Ok(TEST_BOUNDARIES.into()));
        let (adapter, _) = adapter(http, StaticGeocoder::default());
        let in_california = LatLng::new(37.0, -120.0);

        assert_eq!(adapter.hit_test(in_california), HitTest::Miss);

        adapter.load_boundaries().await.unwrap();
        assert_eq!(
            adapter.hit_test(in_california),
            HitTest::Feature {
                code: Code::from("CA")
            }
        );
        assert_eq!(
            adapter.hit_test(LatLng::new(18.0, -66.0)),
            HitTest::Uncoded {
                name: "Puerto Rico".to_string()
            }
        );
        assert_eq!(adapter.hit_test(LatLng::new(45.0, -70.0)), HitTest::Miss);
    }

    #[tokio::test]
    async fn test_resolve_point_state_level() {
        let point = LatLng::new(37.77, -122.42);
        let geocoder = StaticGeocoder::default().with_reverse(
            point,
            Ok(vec![
                component("San Francisco County", "San Francisco County", COUNTY_COMPONENT),
                component("California", "CA", STATE_COMPONENT),
            ]),
        );
        let (adapter, _) = adapter(MockAsyncHttpClient::new(), geocoder);

        let code = adapter.resolve_point(point, Level::State).await.unwrap();
        assert_eq!(code, Code::from("CA"));
    }

    #[tokio::test]
    async fn test_resolve_point_county_level_appends_suffix() {
        let point = LatLng::new(37.77, -122.42);
        let geocoder = StaticGeocoder::default().with_reverse(
            point,
            Ok(vec![
                component("San Francisco", "San Francisco", COUNTY_COMPONENT),
                component("California", "CA", STATE_COMPONENT),
            ]),
        );
        let (adapter, _) = adapter(MockAsyncHttpClient::new(), geocoder);

        let code = adapter.resolve_point(point, Level::County).await.unwrap();
        assert_eq!(code, Code::from("06075"));
    }

    #[tokio::test]
    async fn test_resolve_point_outside_demo_table() {
        let point = LatLng::new(38.05, -122.75);
        let geocoder = StaticGeocoder::default().with_reverse(
            point,
            Ok(vec![
                component("Marin County", "Marin County", COUNTY_COMPONENT),
                component("California", "CA", STATE_COMPONENT),
            ]),
        );
        let (adapter, notices) = adapter(MockAsyncHttpClient::new(), geocoder);

        let err = adapter.resolve_point(point, Level::County).await.unwrap_err();
        assert_eq!(
            err,
            ResolveError::NotCovered {
                label: "Marin County, CA".to_string()
            }
        );
        let notice = notices.current().unwrap();
        assert!(notice.message.contains("demo county data"));
    }

    #[tokio::test]
    async fn test_resolve_point_in_ocean_is_unresolvable() {
        let (adapter, notices) = adapter(MockAsyncHttpClient::new(), StaticGeocoder::default());
        let err = adapter
            .resolve_point(LatLng::new(30.0, -140.0), Level::State)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::Unresolvable {
                level: Level::State
            }
        );
        assert!(notices.current().is_some());
    }

    #[tokio::test]
    async fn test_locate_county_uses_fips_query() {
        let sf = LatLng::new(37.7749, -122.4194);
        let geocoder = StaticGeocoder::default().with_forward("FIPS 06075 county USA", Ok(sf));
        let (adapter, _) = adapter(MockAsyncHttpClient::new(), geocoder);

        assert_eq!(adapter.locate_county(&Code::from("06075")).await.unwrap(), sf);
    }
}
