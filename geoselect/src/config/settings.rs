//! Settings structs for the config file and the resolved runtime configuration.
//!
//! Each `*Settings` struct represents one `[section]` of the INI file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

use crate::geometry::DEFAULT_BOUNDARY_URL;

/// Complete persisted configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    /// Map provider settings
    pub maps: MapsSettings,
    /// Persistence backend settings
    pub backend: BackendSettings,
    /// Boundary dataset settings
    pub boundaries: BoundariesSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// `[maps]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapsSettings {
    /// Google Maps API key
    pub api_key: Option<String>,
}

/// `[backend]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendSettings {
    /// Base URL of the selections REST backend
    pub url: Option<String>,
}

/// `[boundaries]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundariesSettings {
    /// GeoJSON FeatureCollection of state polygons
    pub url: String,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            maps: MapsSettings::default(),
            backend: BackendSettings::default(),
            boundaries: BoundariesSettings {
                url: DEFAULT_BOUNDARY_URL.to_string(),
            },
            logging: LoggingSettings {
                file: super::file::default_log_file(),
            },
        }
    }
}

/// Resolved runtime configuration.
///
/// An empty string means "not configured"; features depending on it are disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    pub api_key: String,
    pub backend_url: String,
}

impl Configuration {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    pub fn has_backend(&self) -> bool {
        !self.backend_url.is_empty()
    }
}

/// Partial update for [`Configuration`]. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPatch {
    pub api_key: Option<String>,
    pub backend_url: Option<String>,
}

impl ConfigPatch {
    pub fn api_key(value: impl Into<String>) -> Self {
        Self {
            api_key: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn backend_url(value: impl Into<String>) -> Self {
        Self {
            backend_url: Some(value.into()),
            ..Self::default()
        }
    }
}
