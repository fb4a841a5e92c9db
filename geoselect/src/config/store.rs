//! Client-local storage for persisted configuration values.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ini::Ini;
use parking_lot::Mutex;
use tracing::{debug, warn};

use super::file::{config_file_path, ConfigFileError};
use super::keys::ConfigKey;
use super::settings::ConfigFile;

/// Key/value persistence behind the resolver's "locally persisted" layer.
pub trait ConfigStore: Send + Sync {
    /// Read a persisted value.
    ///
    /// Missing, blank and unreadable values are all `None`.
    fn read(&self, key: ConfigKey) -> Option<String>;

    /// Persist a value.
    fn write(&self, key: ConfigKey, value: &str) -> Result<(), ConfigFileError>;
}

/// Store backed by the INI config file.
#[derive(Debug, Clone)]
pub struct IniConfigStore {
    path: PathBuf,
}

impl IniConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at ~/.geoselect/config.ini.
    pub fn default_location() -> Self {
        Self::new(config_file_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the whole file (defaults if it does not exist).
    pub fn load(&self) -> Result<ConfigFile, ConfigFileError> {
        ConfigFile::load_from(&self.path)
    }
}

impl ConfigStore for IniConfigStore {
    /// Read one key from the raw file.
    ///
    /// Only this key is validated; a bad value elsewhere in the file does
    /// not hide it.
    fn read(&self, key: ConfigKey) -> Option<String> {
        if !self.path.exists() {
            return None;
        }
        let ini = match Ini::load_from_file(&self.path) {
            Ok(ini) => ini,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Config file unreadable");
                return None;
            }
        };

        let raw = ini.get_from(Some(key.section()), key.key_name())?.trim();
        if raw.is_empty() {
            return None;
        }

        let mut scratch = ConfigFile::default();
        match key.set(&mut scratch, raw) {
            Ok(()) => Some(key.get(&scratch)).filter(|v| !v.is_empty()),
            Err(e) => {
                warn!(key = key.name(), error = %e, "Ignoring invalid persisted value");
                None
            }
        }
    }

    fn write(&self, key: ConfigKey, value: &str) -> Result<(), ConfigFileError> {
        let mut config = self.load()?;
        key.set(&mut config, value)
            .map_err(|e| ConfigFileError::Invalid {
                key: key.name().to_string(),
                value: value.to_string(),
                reason: e.to_string(),
            })?;
        config.save_to(&self.path)?;
        debug!(key = key.name(), path = %self.path.display(), "Config value persisted");
        Ok(())
    }
}

/// In-memory store for tests and embedding hosts without a filesystem.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    values: Mutex<HashMap<ConfigKey, String>>,
    writes: Mutex<Vec<(ConfigKey, String)>>,
    fail_writes: bool,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(self, key: ConfigKey, value: impl Into<String>) -> Self {
        self.values.lock().insert(key, value.into());
        self
    }

    /// A store whose writes always fail.
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Every successful write, in order.
    pub fn writes(&self) -> Vec<(ConfigKey, String)> {
        self.writes.lock().clone()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn read(&self, key: ConfigKey) -> Option<String> {
        self.values
            .lock()
            .get(&key)
            .filter(|v| !v.trim().is_empty())
            .cloned()
    }

    fn write(&self, key: ConfigKey, value: &str) -> Result<(), ConfigFileError> {
        if self.fail_writes {
            return Err(ConfigFileError::Unwritable {
                path: "<memory>".into(),
                source: std::io::Error::other("store is read-only"),
            });
        }
        self.values.lock().insert(key, value.to_string());
        self.writes.lock().push((key, value.to_string()));
        Ok(())
    }
}
