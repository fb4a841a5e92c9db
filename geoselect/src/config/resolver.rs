//! Runtime configuration resolution.
//!
//! `api_key` and `backend_url` are resolved independently through the same
//! precedence chain, highest first:
//!
//! 1. value injected at build time (`GEOSELECT_GMAPS_KEY`, `GEOSELECT_BACKEND_URL`)
//! 2. value persisted in the config store
//! 3. query parameter of the launch URL (`gmaps_key`, `backend`)
//! 4. empty string
//!
//! Empty strings count as absent at every layer.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::keys::ConfigKey;
use super::settings::{ConfigPatch, Configuration};
use super::store::ConfigStore;

/// Launch URL query parameter carrying the API key.
pub const URL_PARAM_API_KEY: &str = "gmaps_key";
/// Launch URL query parameter carrying the backend URL.
pub const URL_PARAM_BACKEND: &str = "backend";

/// One precedence layer. `None` means the layer has no value for that field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub api_key: Option<String>,
    pub backend_url: Option<String>,
}

impl ConfigLayer {
    pub fn new(api_key: Option<&str>, backend_url: Option<&str>) -> Self {
        Self {
            api_key: present(api_key),
            backend_url: present(backend_url),
        }
    }
}

fn present(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Values captured from the build environment.
pub fn build_time_layer() -> ConfigLayer {
    ConfigLayer::new(
        option_env!("GEOSELECT_GMAPS_KEY"),
        option_env!("GEOSELECT_BACKEND_URL"),
    )
}

/// Values taken from the launch URL's query string.
///
/// An unparseable URL yields an empty layer.
pub fn launch_url_layer(launch_url: &str) -> ConfigLayer {
    let url = match reqwest::Url::parse(launch_url) {
        Ok(url) => url,
        Err(e) => {
            warn!(url = launch_url, error = %e, "Ignoring unparseable launch URL");
            return ConfigLayer::default();
        }
    };

    let mut layer = ConfigLayer::default();
    for (name, value) in url.query_pairs() {
        match &*name {
            URL_PARAM_API_KEY if layer.api_key.is_none() => {
                layer.api_key = present(Some(&*value));
            }
            URL_PARAM_BACKEND if layer.backend_url.is_none() => {
                layer.backend_url = present(Some(&*value));
            }
            _ => {}
        }
    }
    layer
}

/// First present value in precedence order, or "".
pub fn resolve_value(build: Option<&str>, persisted: Option<&str>, url: Option<&str>) -> String {
    [build, persisted, url]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|v| !v.is_empty())
        .unwrap_or_default()
        .to_string()
}

fn normalize_backend(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Process-wide configuration holder.
///
/// Resolution happens once at construction; afterwards the configuration
/// changes only through [`set`](Self::set).
pub struct ConfigResolver {
    store: Arc<dyn ConfigStore>,
    current: RwLock<Configuration>,
}

impl ConfigResolver {
    /// Resolve from the build environment, `store` and an optional launch URL.
    pub fn new(store: Arc<dyn ConfigStore>, launch_url: Option<&str>) -> Self {
        let launch = launch_url.map(launch_url_layer).unwrap_or_default();
        Self::with_layers(build_time_layer(), launch, store)
    }

    /// Resolve from explicit build-time and launch URL layers.
    pub fn with_layers(build: ConfigLayer, launch: ConfigLayer, store: Arc<dyn ConfigStore>) -> Self {
        let persisted_key = store.read(ConfigKey::MapsApiKey);
        let persisted_backend = store.read(ConfigKey::BackendUrl);

        let current = Configuration {
            api_key: resolve_value(
                build.api_key.as_deref(),
                persisted_key.as_deref(),
                launch.api_key.as_deref(),
            ),
            backend_url: normalize_backend(resolve_value(
                build.backend_url.as_deref(),
                persisted_backend.as_deref(),
                launch.backend_url.as_deref(),
            )),
        };

        info!(
            has_api_key = current.has_api_key(),
            backend = %current.backend_url,
            "Configuration resolved"
        );

        Self {
            store,
            current: RwLock::new(current),
        }
    }

    pub fn get(&self) -> Configuration {
        self.current.read().clone()
    }

    pub fn has_api_key(&self) -> bool {
        self.current.read().has_api_key()
    }

    pub fn has_backend(&self) -> bool {
        self.current.read().has_backend()
    }

    /// Apply a partial update and persist the fields that changed.
    ///
    /// Empty values change the in-memory configuration but are not
    /// persisted. A failed write is logged; the in-memory value still changes.
    pub fn set(&self, patch: ConfigPatch) -> Configuration {
        let mut changed = Vec::new();
        let updated = {
            let mut current = self.current.write();
            if let Some(api_key) = patch.api_key {
                let api_key = api_key.trim().to_string();
                if api_key != current.api_key {
                    current.api_key = api_key.clone();
                    changed.push((ConfigKey::MapsApiKey, api_key));
                }
            }
            if let Some(backend_url) = patch.backend_url {
                let backend_url = normalize_backend(backend_url.trim().to_string());
                if backend_url != current.backend_url {
                    current.backend_url = backend_url.clone();
                    changed.push((ConfigKey::BackendUrl, backend_url));
                }
            }
            current.clone()
        };

        for (key, value) in changed {
            if value.is_empty() {
                debug!(key = key.name(), "Cleared in memory, not persisted");
                continue;
            }
            match self.store.write(key, &value) {
                Ok(()) => debug!(key = key.name(), "Configuration persisted"),
                Err(e) => warn!(key = key.name(), error = %e, "Failed to persist configuration"),
            }
        }

        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfigStore;

    #[test]
    fn test_precedence_over_all_combinations() {
        for mask in 0..8u8 {
            let build = (mask & 0b100 != 0).then_some("build");
            let persisted = (mask & 0b010 != 0).then_some("persisted");
            let url = (mask & 0b001 != 0).then_some("url");

            let expected = build.or(persisted).or(url).unwrap_or("");
            assert_eq!(
                resolve_value(build, persisted, url),
                expected,
                "mask {:03b}",
                mask
            );
        }
    }

    #[test]
    fn test_precedence_through_resolver_for_all_combinations() {
        for mask in 0..8u8 {
            let build = ConfigLayer::new((mask & 0b100 != 0).then_some("K-build"), None);
            let launch = ConfigLayer::new(
                (mask & 0b001 != 0).then_some("K-url"),
                (mask & 0b001 != 0).then_some("http://url"),
            );
            let mut store = MemoryConfigStore::new();
            if mask & 0b010 != 0 {
                store = store
                    .with_value(ConfigKey::MapsApiKey, "K-persisted")
                    .with_value(ConfigKey::BackendUrl, "http://persisted");
            }

            let resolver = ConfigResolver::with_layers(build, launch, Arc::new(store));
            let config = resolver.get();

            let expected_key = if mask & 0b100 != 0 {
                "K-build"
            } else if mask & 0b010 != 0 {
                "K-persisted"
            } else if mask & 0b001 != 0 {
                "K-url"
            } else {
                ""
            };
            let expected_backend = if mask & 0b010 != 0 {
                "http://persisted"
            } else if mask & 0b001 != 0 {
                "http://url"
            } else {
                ""
            };
            assert_eq!(config.api_key, expected_key, "mask {:03b}", mask);
            assert_eq!(config.backend_url, expected_backend, "mask {:03b}", mask);
        }
    }

    #[test]
    fn test_empty_strings_count_as_absent() {
        assert_eq!(resolve_value(Some(""), Some("  "), Some("url")), "url");
        assert_eq!(ConfigLayer::new(Some(""), Some(" ")), ConfigLayer::default());
    }

    #[test]
    fn test_launch_url_layer() {
        let layer =
            launch_url_layer("http://localhost:5173/?gmaps_key=AIza%2B1&backend=http%3A%2F%2Fapi");
        assert_eq!(layer.api_key.as_deref(), Some("AIza+1"));
        assert_eq!(layer.backend_url.as_deref(), Some("http://api"));

        assert_eq!(launch_url_layer("not a url"), ConfigLayer::default());
        assert_eq!(
            launch_url_layer("http://localhost/?gmaps_key="),
            ConfigLayer::default()
        );
    }

    #[test]
    fn test_set_persists_changed_fields_only() {
        let store = Arc::new(MemoryConfigStore::new());
        let resolver = ConfigResolver::with_layers(
            ConfigLayer::default(),
            ConfigLayer::default(),
            store.clone(),
        );

        resolver.set(ConfigPatch::api_key("AIza-1"));
        resolver.set(ConfigPatch {
            api_key: Some("AIza-1".to_string()),
            backend_url: Some("http://localhost:8000/".to_string()),
        });

        assert_eq!(
            store.writes(),
            vec![
                (ConfigKey::MapsApiKey, "AIza-1".to_string()),
                (ConfigKey::BackendUrl, "http://localhost:8000".to_string()),
            ]
        );
        assert!(resolver.has_api_key());
        assert!(resolver.has_backend());
    }

    #[test]
    fn test_set_empty_is_not_persisted() {
        let store = Arc::new(MemoryConfigStore::new().with_value(ConfigKey::MapsApiKey, "old"));
        let resolver = ConfigResolver::with_layers(
            ConfigLayer::default(),
            ConfigLayer::default(),
            store.clone(),
        );

        let config = resolver.set(ConfigPatch::api_key(""));
        assert_eq!(config.api_key, "");
        assert!(store.writes().is_empty());
    }

    #[test]
    fn test_failed_write_still_updates_memory() {
        let resolver = ConfigResolver::with_layers(
            ConfigLayer::default(),
            ConfigLayer::default(),
            Arc::new(MemoryConfigStore::failing()),
        );
        resolver.set(ConfigPatch::backend_url("http://localhost:8000"));
        assert_eq!(resolver.get().backend_url, "http://localhost:8000");
    }
}
