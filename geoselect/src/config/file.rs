//! The on-disk settings file, `~/.geoselect/config.ini`.
//!
//! A missing file is not an error: every setting has a default, and the file
//! is created the first time something is persisted. Field definitions are
//! in [`super::settings`]; INI mapping is in [`super::parser`] and
//! [`super::writer`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use super::settings::ConfigFile;

/// Directory under the home directory holding config and logs.
const APP_DIR: &str = ".geoselect";

/// Overrides the application directory (used by tests and portable installs).
pub const HOME_ENV: &str = "GEOSELECT_HOME";

#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// The file exists but is not valid INI
    #[error("Cannot read settings: {0}")]
    Unreadable(#[from] ini::Error),

    /// A value in the file does not pass validation
    #[error("Bad setting {key} = '{value}': {reason}")]
    Invalid {
        /// Dotted key, e.g. `backend.url`
        key: String,
        value: String,
        reason: String,
    },

    /// Creating the directory or writing the file failed
    #[error("Cannot write settings to {}: {source}", path.display())]
    Unwritable { path: PathBuf, source: io::Error },
}

impl ConfigFile {
    /// Read [`config_file_path`], falling back to defaults when absent.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        match path.try_exists() {
            Ok(true) => super::parser::parse_ini(&Ini::load_from_file(path)?),
            _ => Ok(Self::default()),
        }
    }

    /// Write to [`config_file_path`].
    pub fn save(&self) -> Result<(), ConfigFileError> {
        self.save_to(&config_file_path())
    }

    /// Write the whole file, creating parent directories as needed.
    ///
    /// The content goes to a sibling temp file first and is renamed into
    /// place, so readers never see a partial file.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        let unwritable = |source| ConfigFileError::Unwritable {
            path: path.to_path_buf(),
            source,
        };

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(unwritable)?;
        }

        let staging = path.with_extension("ini.tmp");
        fs::write(&staging, super::writer::to_config_string(self)).map_err(unwritable)?;
        fs::rename(&staging, path).map_err(unwritable)
    }
}

/// Application directory: `$GEOSELECT_HOME`, else `~/.geoselect`.
pub fn config_directory() -> PathBuf {
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .map(|home| home.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(APP_DIR))
}

pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

pub fn default_log_file() -> PathBuf {
    config_directory().join("logs").join("geoselect.log")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::DEFAULT_BOUNDARY_URL;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::TempDir::new().unwrap();

        let config = ConfigFile::load_from(&dir.path().join("missing.ini")).unwrap();

        assert_eq!(config, ConfigFile::default());
        assert!(config.maps.api_key.is_none());
        assert!(config.backend.url.is_none());
        assert_eq!(config.boundaries.url, DEFAULT_BOUNDARY_URL);
        assert!(config.logging.file.ends_with("logs/geoselect.log"));
    }

    #[test]
    fn test_save_creates_directories_and_round_trips_values() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("profile").join("config.ini");

        let mut config = ConfigFile::default();
        config.maps.api_key = Some("AIza-test".to_string());
        config.backend.url = Some("http://localhost:8000".to_string());
        config.save_to(&path).unwrap();

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded.maps.api_key.as_deref(), Some("AIza-test"));
        assert_eq!(loaded.backend.url.as_deref(), Some("http://localhost:8000"));
        assert!(!path.with_extension("ini.tmp").exists());
    }

    #[test]
    fn test_save_into_a_file_path_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let err = ConfigFile::default()
            .save_to(&blocker.join("config.ini"))
            .unwrap_err();

        assert!(matches!(err, ConfigFileError::Unwritable { .. }));
    }
}
