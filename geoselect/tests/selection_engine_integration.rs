//! Integration tests for the selection engine.
//!
//! These tests drive the public API end to end with a scripted HTTP client:
//! - config file → resolver → engine wiring
//! - polygon and geocoded clicks through the Google geocoder response format
//! - level switching and county markers
//! - saving and listing against the REST backend

use std::sync::Arc;

use geoselect::config::{ConfigLayer, ConfigPatch, ConfigResolver, IniConfigStore};
use geoselect::engine::{EngineError, SelectionEngine};
use geoselect::geometry::{GoogleGeocoder, LatLng};
use geoselect::http::{AsyncHttpClient, HttpError};
use geoselect::overlay::{ClickOutcome, HeadlessSurface, RenderMode, SELECTED_STYLE};
use geoselect::persistence::PersistenceError;
use geoselect::region::{Code, Level};
use parking_lot::Mutex;

// =============================================================================
// Test Helpers
// =============================================================================

const BOUNDARY_URL: &str = "http://boundaries.test/us-states.json";
const GEOCODE_URL: &str = "http://geocode.test/json";
const BACKEND_URL: &str = "http://backend.test";

const BOUNDARIES: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {"type": "Feature", "properties": {"name": "California"},
         "geometry": {"type": "Polygon", "coordinates": [[[-124, 32], [-114, 32], [-114, 42], [-124, 42], [-124, 32]]]}},
        {"type": "Feature", "properties": {"name": "Texas"},
         "geometry": {"type": "Polygon", "coordinates": [[[-106, 26], [-94, 26], [-94, 36], [-106, 36], [-106, 26]]]}}
    ]
}"#;

const SF_REVERSE: &str = r#"{
    "status": "OK",
    "results": [{
        "address_components": [
            {"long_name": "San Francisco", "short_name": "SF", "types": ["locality", "political"]},
            {"long_name": "San Francisco County", "short_name": "San Francisco County", "types": ["administrative_area_level_2", "political"]},
            {"long_name": "California", "short_name": "CA", "types": ["administrative_area_level_1", "political"]}
        ],
        "geometry": {"location": {"lat": 37.7793, "lng": -122.4193}}
    }]
}"#;

const SF_FORWARD: &str = r#"{
    "status": "OK",
    "results": [{"address_components": [], "geometry": {"location": {"lat": 37.7749, "lng": -122.4194}}}]
}"#;

/// HTTP client answering from a prefix table and recording requests.
#[derive(Clone, Default)]
struct ScriptedHttp {
    routes: Arc<Mutex<Vec<(&'static str, String, Result<Vec<u8>, HttpError>)>>>,
    requests: Arc<Mutex<Vec<(&'static str, String, Option<String>)>>>,
}

impl ScriptedHttp {
    fn route(self, method: &'static str, prefix: &str, body: &str) -> Self {
        self.routes
            .lock()
            .push((method, prefix.to_string(), Ok(body.as_bytes().to_vec())));
        self
    }

    fn count(&self, method: &str, prefix: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|(m, url, _)| *m == method && url.starts_with(prefix))
            .count()
    }

    fn answer(&self, method: &'static str, url: &str, body: Option<&str>) -> Result<Vec<u8>, HttpError> {
        self.requests
            .lock()
            .push((method, url.to_string(), body.map(str::to_string)));
        self.routes
            .lock()
            .iter()
            .find(|(m, prefix, _)| *m == method && url.starts_with(prefix.as_str()))
            .map(|(_, _, response)| response.clone())
            .unwrap_or_else(|| {
                Err(HttpError::Status {
                    status: 404,
                    url: url.to_string(),
                })
            })
    }
}

impl AsyncHttpClient for ScriptedHttp {
    async fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        self.answer("GET", url, None)
    }

    async fn post_json(&self, url: &str, json_body: &str) -> Result<Vec<u8>, HttpError> {
        self.answer("POST", url, Some(json_body))
    }
}

type TestEngine = SelectionEngine<ScriptedHttp, GoogleGeocoder<ScriptedHttp>, HeadlessSurface>;

fn engine_with_config_file(
    dir: &tempfile::TempDir,
    contents: &str,
    http: ScriptedHttp,
) -> TestEngine {
    let path = dir.path().join("config.ini");
    std::fs::write(&path, contents).unwrap();

    let config = Arc::new(ConfigResolver::with_layers(
        ConfigLayer::default(),
        ConfigLayer::default(),
        Arc::new(IniConfigStore::new(path)),
    ));
    let geocoder =
        GoogleGeocoder::with_endpoint(http.clone(), config.get().api_key, GEOCODE_URL);
    SelectionEngine::new(config, http, geocoder, HeadlessSurface::new(), BOUNDARY_URL)
}

fn full_config() -> String {
    format!("[maps]\napi_key = AIza-int\n\n[backend]\nurl = {}\n", BACKEND_URL)
}

// =============================================================================
// Integration Tests
// =============================================================================

#[tokio::test]
async fn test_state_clicks_then_county_marker_then_save() {
    let list_url = format!("{}/api/selections", BACKEND_URL);
    let http = ScriptedHttp::default()
        .route("GET", BOUNDARY_URL, BOUNDARIES)
        .route("GET", &format!("{}?latlng=37.77", GEOCODE_URL), SF_REVERSE)
        .route("GET", &format!("{}?address=FIPS+06075", GEOCODE_URL), SF_FORWARD)
        .route(
            "POST",
            &list_url,
            r#"{"id": 9, "name": "Bay Area", "level": "county", "items": ["06075"]}"#,
        )
        .route(
            "GET",
            &list_url,
            r#"[{"id": 9, "name": "Bay Area", "level": "county", "items": ["06075"]}]"#,
        );
    let dir = tempfile::TempDir::new().unwrap();
    let engine = engine_with_config_file(&dir, &full_config(), http.clone());

    engine.ensure_provider_initialized().await.unwrap();

    // Polygon clicks toggle without geocoding.
    engine.handle_click(LatLng::new(37.0, -120.0)).await.unwrap();
    engine.handle_click(LatLng::new(30.0, -100.0)).await.unwrap();
    assert_eq!(
        engine.snapshot().items,
        vec![Code::from("CA"), Code::from("TX")]
    );
    assert_eq!(http.count("GET", GEOCODE_URL), 0);
    let selected = engine
        .frame()
        .polygons
        .iter()
        .filter(|p| p.style == SELECTED_STYLE)
        .count();
    assert_eq!(selected, 2);

    engine.set_level(Level::County).await;
    assert!(engine.snapshot().items.is_empty());
    assert_eq!(engine.frame().mode, RenderMode::CountyMode);

    let outcome = engine
        .handle_click(LatLng::new(37.77, -122.42))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        ClickOutcome::Toggled {
            code: Code::from("06075"),
            selected: true
        }
    );

    let frame = engine.frame();
    assert_eq!(frame.markers.len(), 1);
    assert_eq!(frame.markers[0].title, "06075");
    assert_eq!(frame.markers[0].position, LatLng::new(37.7749, -122.4194));

    let list = engine.save("Bay Area").await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(engine.saved()[0].id, 9);
    assert_eq!(
        engine.export_url(9).unwrap(),
        "http://backend.test/api/selections/9/export.csv"
    );
}

#[tokio::test]
async fn test_empty_name_save_issues_no_request() {
    let http = ScriptedHttp::default();
    let dir = tempfile::TempDir::new().unwrap();
    let engine = engine_with_config_file(&dir, &full_config(), http.clone());
    engine.toggle(Code::from("CA")).await;

    let err = engine.save("  ").await.unwrap_err();

    assert!(matches!(
        err,
        EngineError::Persistence(PersistenceError::EmptyName)
    ));
    assert_eq!(http.count("POST", BACKEND_URL), 0);
    assert!(engine.notice().is_some());
}

#[tokio::test]
async fn test_list_initial_tolerates_backend_outage() {
    let http = ScriptedHttp::default();
    let dir = tempfile::TempDir::new().unwrap();
    let engine = engine_with_config_file(&dir, &full_config(), http);

    assert!(engine.list_initial().await.is_empty());
}

#[tokio::test]
async fn test_missing_key_in_config_file_disables_map() {
    let http = ScriptedHttp::default();
    let dir = tempfile::TempDir::new().unwrap();
    let engine = engine_with_config_file(&dir, "[maps]\napi_key =\n", http.clone());

    assert!(matches!(
        engine.ensure_provider_initialized().await,
        Err(EngineError::MissingApiKey)
    ));
    assert_eq!(http.count("GET", BOUNDARY_URL), 0);
}

#[tokio::test]
async fn test_update_config_persists_to_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let engine = engine_with_config_file(&dir, "", ScriptedHttp::default());

    engine.update_config(ConfigPatch::backend_url("http://localhost:8000"));

    let contents = std::fs::read_to_string(dir.path().join("config.ini")).unwrap();
    assert!(contents.contains("url = http://localhost:8000"));
    assert_eq!(engine.config().backend_url, "http://localhost:8000");
}
