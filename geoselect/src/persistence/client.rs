//! Call-and-refresh client for the selections REST backend.
//!
//! # Endpoints
//!
//! - `POST {base}/api/selections` with `{name, level, items}`
//! - `GET {base}/api/selections` → `[{id, name, level, items}]`
//! - `GET {base}/api/selections/{id}/export.csv` (linked, never fetched here)
//!
//! The saved-list cache is only ever replaced by a successful list
//! response; there is no optimistic insert.

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::types::{NewSelection, PersistenceError, SavedSelection};
use crate::http::AsyncHttpClient;
use crate::region::{Code, Level};

const SELECTIONS_PATH: &str = "/api/selections";

/// Client for saving and listing selections.
pub struct PersistenceClient<C: AsyncHttpClient> {
    http_client: C,
    base_url: RwLock<String>,
    saved: RwLock<Vec<SavedSelection>>,
}

impl<C: AsyncHttpClient> PersistenceClient<C> {
    /// Create a client. An empty `base_url` leaves persistence disabled.
    pub fn new(http_client: C, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: RwLock::new(trim_base(base_url.into())),
            saved: RwLock::new(Vec::new()),
        }
    }

    pub fn base_url(&self) -> String {
        self.base_url.read().clone()
    }

    pub fn set_base_url(&self, base_url: impl Into<String>) {
        *self.base_url.write() = trim_base(base_url.into());
    }

    pub fn is_configured(&self) -> bool {
        !self.base_url.read().is_empty()
    }

    fn selections_url(&self) -> Result<String, PersistenceError> {
        let base = self.base_url.read();
        if base.is_empty() {
            return Err(PersistenceError::NotConfigured);
        }
        Ok(format!("{}{}", base, SELECTIONS_PATH))
    }

    /// Snapshot of the cached saved list.
    pub fn saved(&self) -> Vec<SavedSelection> {
        self.saved.read().clone()
    }

    /// Save a named selection, then reload the list.
    ///
    /// Returns the refreshed list. On any failure the cache is left as it was.
    pub async fn save(
        &self,
        name: &str,
        level: Level,
        items: &[Code],
    ) -> Result<Vec<SavedSelection>, PersistenceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PersistenceError::EmptyName);
        }
        let url = self.selections_url()?;

        let body = serde_json::to_string(&NewSelection { name, level, items })
            .map_err(|e| PersistenceError::Json(e.to_string()))?;

        debug!(url = %url, name = name, level = %level, items = items.len(), "Saving selection");
        self.http_client.post_json(&url, &body).await.map_err(|e| {
            warn!(url = %url, error = %e, "Save failed");
            PersistenceError::from(e)
        })?;
        info!(name = name, level = %level, items = items.len(), "Selection saved");

        self.refresh()
            .await
            .map_err(|e| PersistenceError::RefreshFailed(e.to_string()))
    }

    /// Reload the saved list from the backend and replace the cache.
    pub async fn refresh(&self) -> Result<Vec<SavedSelection>, PersistenceError> {
        let url = self.selections_url()?;
        let body = self.http_client.get(&url).await?;
        let list: Vec<SavedSelection> =
            serde_json::from_slice(&body).map_err(|e| PersistenceError::Json(e.to_string()))?;

        debug!(url = %url, count = list.len(), "Saved selections loaded");
        *self.saved.write() = list.clone();
        Ok(list)
    }

    /// Startup load. Failures are logged and yield an empty list.
    pub async fn list_initial(&self) -> Vec<SavedSelection> {
        if !self.is_configured() {
            debug!("No backend configured, skipping saved list load");
            return Vec::new();
        }
        match self.refresh().await {
            Ok(list) => list,
            Err(e) => {
                warn!(error = %e, "Could not load saved selections");
                Vec::new()
            }
        }
    }

    /// Link to the backend's CSV export for a saved selection.
    pub fn export_url(&self, id: u64) -> Result<String, PersistenceError> {
        Ok(format!("{}/{}/export.csv", self.selections_url()?, id))
    }
}

fn trim_base(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
