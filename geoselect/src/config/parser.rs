//! `Ini` → [`ConfigFile`].
//!
//! Every known key is read through [`ConfigKey::set`], so the file and the
//! `config set` command share one set of validation rules. Unknown sections
//! and keys are ignored.

use ini::Ini;
use std::path::PathBuf;

use super::file::ConfigFileError;
use super::keys::{ConfigKey, ConfigKeyError};
use super::settings::ConfigFile;

pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    for key in ConfigKey::all() {
        let Some(raw) = ini.get_from(Some(key.section()), key.key_name()) else {
            continue;
        };
        // Blank keeps the default.
        if raw.trim().is_empty() {
            continue;
        }
        key.set(&mut config, raw).map_err(|e| ConfigFileError::Invalid {
            key: key.name().to_string(),
            value: raw.trim().to_string(),
            reason: match e {
                ConfigKeyError::ValidationFailed { reason, .. } => reason,
                other => other.to_string(),
            },
        })?;
    }

    Ok(config)
}

pub(super) fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// `~/x` → `$HOME/x`; anything else unchanged.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
