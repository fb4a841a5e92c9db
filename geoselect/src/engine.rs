//! Engine facade wiring configuration, selection, overlay and persistence.
//!
//! A host creates one [`SelectionEngine`] per session, calls
//! [`ensure_provider_initialized`](SelectionEngine::ensure_provider_initialized)
//! when the map is shown, and routes checklist and map events through it.
//! Without an API key the checklist still works; the map (and click
//! resolution) stay disabled. Without a backend URL saving is disabled.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::config::{ConfigPatch, ConfigResolver, Configuration};
use crate::geometry::{Geocoder, GeometryAdapter, GoogleGeocoder, LatLng, ResolveError};
use crate::http::{AsyncHttpClient, AsyncReqwestClient, HttpError};
use crate::notice::{Notice, NoticeBoard};
use crate::overlay::{ClickOutcome, MapSurface, OverlayFrame, OverlaySynchronizer};
use crate::persistence::{PersistenceClient, PersistenceError, SavedSelection};
use crate::region::{Code, Level};
use crate::selection::{SelectionSnapshot, SharedSelection};

/// Errors surfaced by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No API key; the map and click resolution are disabled.
    #[error("No Google Maps API key configured")]
    MissingApiKey,

    /// No backend URL; saving and listing are disabled.
    #[error("No backend URL configured")]
    MissingBackend,

    /// A map operation was attempted before the provider was initialized.
    #[error("Map provider is not initialized")]
    MapUnavailable,

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Http(#[from] HttpError),
}

/// Engine using reqwest and the Google geocoder.
pub type DefaultEngine<S> =
    SelectionEngine<AsyncReqwestClient, GoogleGeocoder<AsyncReqwestClient>, S>;

/// The selection engine.
pub struct SelectionEngine<C, G, S>
where
    C: AsyncHttpClient + Clone,
    G: Geocoder,
    S: MapSurface,
{
    config: Arc<ConfigResolver>,
    notices: NoticeBoard,
    selection: SharedSelection,
    overlay: OverlaySynchronizer<C, G, S>,
    persistence: PersistenceClient<C>,
    provider: OnceCell<()>,
}

impl<S: MapSurface> DefaultEngine<S> {
    /// Build an engine with the production HTTP client and geocoder.
    ///
    /// The geocoder captures the API key at construction; a key changed
    /// later takes effect in the next session.
    pub fn with_defaults(
        config: Arc<ConfigResolver>,
        surface: S,
        boundary_url: &str,
    ) -> Result<Self, EngineError> {
        let http = AsyncReqwestClient::new()?;
        let geocoder = GoogleGeocoder::new(http.clone(), config.get().api_key);
        Ok(Self::new(config, http, geocoder, surface, boundary_url))
    }
}

impl<C, G, S> SelectionEngine<C, G, S>
where
    C: AsyncHttpClient + Clone,
    G: Geocoder,
    S: MapSurface,
{
    pub fn new(
        config: Arc<ConfigResolver>,
        http_client: C,
        geocoder: G,
        surface: S,
        boundary_url: &str,
    ) -> Self {
        let notices = NoticeBoard::new();
        let selection = SharedSelection::default();
        let adapter =
            GeometryAdapter::new(http_client.clone(), geocoder, boundary_url, notices.clone());
        let persistence = PersistenceClient::new(http_client, config.get().backend_url);

        Self {
            config,
            notices,
            selection: selection.clone(),
            overlay: OverlaySynchronizer::new(selection, adapter, surface),
            persistence,
            provider: OnceCell::new(),
        }
    }

    /// Initialize the map provider. A host holds one engine, so this runs
    /// once per process.
    ///
    /// Later calls return immediately. Fails (and posts a notice) when no
    /// API key is configured; nothing is memoized in that case.
    pub async fn ensure_provider_initialized(&self) -> Result<(), EngineError> {
        if !self.config.has_api_key() {
            self.notices
                .post_blocking("Map disabled: no Google Maps API key configured.");
            return Err(EngineError::MissingApiKey);
        }

        self.provider
            .get_or_init(|| async {
                info!("Initializing map provider");
                self.overlay.sync().await;
            })
            .await;
        Ok(())
    }

    pub fn is_map_ready(&self) -> bool {
        self.provider.initialized()
    }

    /// Toggle a code (checklist path). Returns whether it is now selected.
    pub async fn toggle(&self, code: Code) -> bool {
        if self.is_map_ready() {
            self.overlay.toggle(code).await
        } else {
            self.selection.toggle(code)
        }
    }

    /// Switch level; the selection is cleared.
    pub async fn set_level(&self, level: Level) {
        if self.is_map_ready() {
            self.overlay.set_level(level).await;
        } else {
            self.selection.set_level(level);
        }
    }

    pub async fn clear(&self) {
        if self.is_map_ready() {
            self.overlay.clear().await;
        } else {
            self.selection.clear();
        }
    }

    /// Route a map click through the single dispatch point.
    pub async fn handle_click(&self, point: LatLng) -> Result<ClickOutcome, EngineError> {
        if !self.is_map_ready() {
            return Err(EngineError::MapUnavailable);
        }
        Ok(self.overlay.handle_click(point).await)
    }

    /// Resolve a point to a code without touching the selection.
    pub async fn resolve_point(&self, point: LatLng, level: Level) -> Result<Code, EngineError> {
        if !self.config.has_api_key() {
            return Err(EngineError::MissingApiKey);
        }
        Ok(self.overlay.adapter().resolve_point(point, level).await?)
    }

    /// Redraw the overlay from current state.
    pub async fn sync(&self) {
        if self.is_map_ready() {
            self.overlay.sync().await;
        }
    }

    /// Save the current selection under `name`.
    ///
    /// Returns the refreshed saved list. When the record was stored but the
    /// list reload failed, the save still counts as done and the previous
    /// (stale) list is returned.
    pub async fn save(&self, name: &str) -> Result<Vec<SavedSelection>, EngineError> {
        if !self.config.has_backend() {
            self.notices
                .post_blocking("Saving is disabled: no backend URL configured.");
            return Err(EngineError::MissingBackend);
        }

        let snapshot = self.selection.snapshot();
        match self
            .persistence
            .save(name, snapshot.level, &snapshot.items)
            .await
        {
            Ok(list) => Ok(list),
            Err(PersistenceError::RefreshFailed(reason)) => {
                warn!(name = name.trim(), error = %reason, "Saved, but list refresh failed");
                self.notices
                    .post_transient("Saved. The saved list could not be refreshed.");
                Ok(self.persistence.saved())
            }
            Err(PersistenceError::EmptyName) => {
                self.notices.post_transient("Enter a name before saving.");
                Err(PersistenceError::EmptyName.into())
            }
            Err(e) => {
                self.notices.post_blocking(format!("Save failed: {}", e));
                Err(e.into())
            }
        }
    }

    /// Cached saved selections.
    pub fn saved(&self) -> Vec<SavedSelection> {
        self.persistence.saved()
    }

    /// Startup load of saved selections. Never fails.
    pub async fn list_initial(&self) -> Vec<SavedSelection> {
        self.persistence.list_initial().await
    }

    /// Reload saved selections from the backend.
    pub async fn refresh_saved(&self) -> Result<Vec<SavedSelection>, EngineError> {
        if !self.config.has_backend() {
            return Err(EngineError::MissingBackend);
        }
        Ok(self.persistence.refresh().await?)
    }

    pub fn export_url(&self, id: u64) -> Result<String, EngineError> {
        if !self.config.has_backend() {
            return Err(EngineError::MissingBackend);
        }
        Ok(self.persistence.export_url(id)?)
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        self.selection.snapshot()
    }

    pub fn selection(&self) -> &SharedSelection {
        &self.selection
    }

    /// The frame last sent to the surface.
    pub fn frame(&self) -> OverlayFrame {
        self.overlay.frame()
    }

    pub fn surface(&self) -> &S {
        self.overlay.surface()
    }

    /// The visible notice, if any.
    pub fn notice(&self) -> Option<Notice> {
        self.notices.current()
    }

    pub fn dismiss_notice(&self) {
        self.notices.dismiss();
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn config(&self) -> Configuration {
        self.config.get()
    }

    /// Update configuration; the backend URL applies immediately.
    pub fn update_config(&self, patch: ConfigPatch) -> Configuration {
        let updated = self.config.set(patch);
        if updated.backend_url != self.persistence.base_url() {
            debug!(backend = %updated.backend_url, "Backend URL changed");
            self.persistence.set_base_url(updated.backend_url.clone());
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigKey, ConfigLayer, MemoryConfigStore};
    use crate::geometry::{StaticGeocoder, BOUNDARY_URL, TEST_BOUNDARIES};
    use crate::http::tests::MockAsyncHttpClient;
    use crate::notice::NoticeSeverity;
    use crate::overlay::{HeadlessSurface, RenderMode};

    type TestEngine = SelectionEngine<MockAsyncHttpClient, StaticGeocoder, HeadlessSurface>;

    fn engine(store: MemoryConfigStore, http: MockAsyncHttpClient) -> TestEngine {
        let config = Arc::new(ConfigResolver::with_layers(
            ConfigLayer::default(),
            ConfigLayer::default(),
            Arc::new(store),
        ));
        SelectionEngine::new(
            config,
            http,
            StaticGeocoder::default(),
            HeadlessSurface::new(),
            BOUNDARY_URL,
        )
    }

    fn configured_store() -> MemoryConfigStore {
        MemoryConfigStore::new()
            .with_value(ConfigKey::MapsApiKey, "AIza-test")
            .with_value(ConfigKey::BackendUrl, "http://backend.test")
    }

    #[tokio::test]
    async fn test_missing_api_key_disables_map() {
        let engine = engine(MemoryConfigStore::new(), MockAsyncHttpClient::new());

        let err = engine.ensure_provider_initialized().await.unwrap_err();
        assert!(matches!(err, EngineError::MissingApiKey));
        assert_eq!(engine.notice().unwrap().severity, NoticeSeverity::Blocking);
        assert!(!engine.is_map_ready());

        // Checklist toggles still work.
        assert!(engine.toggle(Code::from("CA")).await);
        assert!(matches!(
            engine.handle_click(LatLng::new(37.0, -120.0)).await,
            Err(EngineError::MapUnavailable)
        ));
    }

    #[tokio::test]
    async fn test_provider_initialization_is_idempotent() {
        let http = MockAsyncHttpClient::new().on_get(BOUNDARY_URL, Ok(TEST_BOUNDARIES.into()));
        let engine = engine(configured_store(), http.clone());

        engine.ensure_provider_initialized().await.unwrap();
        engine.ensure_provider_initialized().await.unwrap();

        assert!(engine.is_map_ready());
        assert_eq!(engine.surface().render_count(), 1);
        assert_eq!(engine.frame().mode, RenderMode::StateMode);
        assert_eq!(http.request_count("GET", BOUNDARY_URL), 1);
    }

    #[tokio::test]
    async fn test_save_disabled_without_backend() {
        let store = MemoryConfigStore::new().with_value(ConfigKey::MapsApiKey, "k");
        let http = MockAsyncHttpClient::new();
        let engine = engine(store, http.clone());

        let err = engine.save("West").await.unwrap_err();
        assert!(matches!(err, EngineError::MissingBackend));
        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn test_failed_save_posts_blocking_notice() {
        let engine = engine(configured_store(), MockAsyncHttpClient::new());
        engine.toggle(Code::from("CA")).await;

        let err = engine.save("West").await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Persistence(PersistenceError::Http(_))
        ));
        let notice = engine.notice().unwrap();
        assert_eq!(notice.severity, NoticeSeverity::Blocking);
        assert!(notice.message.starts_with("Save failed"));
        assert_eq!(engine.snapshot().items, vec![Code::from("CA")]);
    }

    #[tokio::test]
    async fn test_refresh_failure_after_save_is_not_a_failed_save() {
        let list_url = "http://backend.test/api/selections";
        let http = MockAsyncHttpClient::new()
            .on_get(
                list_url,
                Ok(br#"[{"id": 1, "name": "West", "level": "state", "items": ["CA"]}]"#.to_vec()),
            )
            .on_post(
                list_url,
                Ok(br#"{"id": 2, "name": "East", "level": "state", "items": ["NY"]}"#.to_vec()),
            );
        let engine = engine(configured_store(), http.clone());
        engine.refresh_saved().await.unwrap();
        http.set_route(
            "GET",
            list_url,
            Err(crate::http::HttpError::Status {
                status: 500,
                url: list_url.to_string(),
            }),
        );
        engine.toggle(Code::from("NY")).await;

        let list = engine.save("East").await.unwrap();

        assert_eq!(list.len(), 1);
        assert_eq!(engine.saved()[0].name, "West");
        assert_eq!(http.request_count("POST", list_url), 1);
        let notice = engine.notice().unwrap();
        assert_eq!(notice.severity, NoticeSeverity::Transient);
        assert!(!notice.message.contains("failed"));
    }

    #[tokio::test]
    async fn test_update_config_switches_backend() {
        let store = MemoryConfigStore::new().with_value(ConfigKey::MapsApiKey, "k");
        let engine = engine(store, MockAsyncHttpClient::new());
        assert!(engine.export_url(3).is_err());

        engine.update_config(ConfigPatch::backend_url("http://new.test/"));
        assert_eq!(
            engine.export_url(3).unwrap(),
            "http://new.test/api/selections/3/export.csv"
        );
    }
}
