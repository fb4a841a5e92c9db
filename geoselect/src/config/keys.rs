//! Dotted setting names (`backend.url`) mapped onto [`ConfigFile`] fields.
//!
//! The INI parser, the persisted resolver layer and `geoselect config` all
//! go through [`ConfigKey`], so a value is validated the same way wherever
//! it comes from.

use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use super::parser::{expand_tilde, is_http_url};
use super::settings::ConfigFile;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigKeyError {
    #[error("No setting named '{0}'")]
    UnknownKey(String),

    #[error("{key} {reason}")]
    ValidationFailed { key: String, reason: String },
}

/// A persisted setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    MapsApiKey,
    BackendUrl,
    BoundariesUrl,
    LoggingFile,
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "maps.api_key" => Ok(ConfigKey::MapsApiKey),
            "backend.url" => Ok(ConfigKey::BackendUrl),
            "boundaries.url" => Ok(ConfigKey::BoundariesUrl),
            "logging.file" => Ok(ConfigKey::LoggingFile),
            _ => Err(ConfigKeyError::UnknownKey(s.to_string())),
        }
    }
}

impl ConfigKey {
    /// All keys, in config file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::MapsApiKey,
            ConfigKey::BackendUrl,
            ConfigKey::BoundariesUrl,
            ConfigKey::LoggingFile,
        ]
    }

    /// `section.key` form.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::MapsApiKey => "maps.api_key",
            ConfigKey::BackendUrl => "backend.url",
            ConfigKey::BoundariesUrl => "boundaries.url",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    pub fn section(&self) -> &'static str {
        self.split_name().0
    }

    /// Key within the INI section.
    pub fn key_name(&self) -> &'static str {
        self.split_name().1
    }

    fn split_name(&self) -> (&'static str, &'static str) {
        self.name().split_once('.').unwrap_or(("", self.name()))
    }

    /// Current value as text; `""` when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::MapsApiKey => config.maps.api_key.clone().unwrap_or_default(),
            ConfigKey::BackendUrl => config.backend.url.clone().unwrap_or_default(),
            ConfigKey::BoundariesUrl => config.boundaries.url.clone(),
            ConfigKey::LoggingFile => path_to_display(&config.logging.file),
        }
    }

    /// Trim, validate and store `value`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        let value = value.trim();
        self.validate(value)?;
        match self {
            ConfigKey::MapsApiKey => config.maps.api_key = optional_string(value),
            ConfigKey::BackendUrl => {
                config.backend.url = optional_string(value.trim_end_matches('/'))
            }
            ConfigKey::BoundariesUrl => config.boundaries.url = value.to_string(),
            ConfigKey::LoggingFile => config.logging.file = expand_tilde(value),
        }
        Ok(())
    }

    pub fn validate(&self, value: &str) -> Result<(), ConfigKeyError> {
        let result = match self {
            ConfigKey::MapsApiKey => Ok(()),
            ConfigKey::BackendUrl if value.is_empty() => Ok(()),
            ConfigKey::BackendUrl | ConfigKey::BoundariesUrl => {
                if is_http_url(value) {
                    Ok(())
                } else {
                    Err("must be a URL starting with 'http://' or 'https://'")
                }
            }
            ConfigKey::LoggingFile => {
                if value.is_empty() {
                    Err("must be a valid path")
                } else {
                    Ok(())
                }
            }
        };

        result.map_err(|reason| ConfigKeyError::ValidationFailed {
            key: self.name().to_string(),
            reason: reason.to_string(),
        })
    }

    /// True for values that should be masked when displayed.
    pub fn is_secret(&self) -> bool {
        matches!(self, ConfigKey::MapsApiKey)
    }
}

/// Home-relative paths are shown with `~/`.
fn path_to_display(path: &Path) -> String {
    dirs::home_dir()
        .and_then(|home| path.strip_prefix(home).ok().map(|rest| format!("~/{}", rest.display())))
        .unwrap_or_else(|| path.display().to_string())
}

fn optional_string(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
