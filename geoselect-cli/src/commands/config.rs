//! `geoselect config` - read and edit the persisted settings file.
//!
//! Values shown here are what is on disk. The effective values of a
//! session can differ: a build-time value wins over the file, and the file
//! wins over `--launch-url` parameters.

use clap::Subcommand;
use geoselect::config::{config_file_path, ConfigFile, ConfigKey};

use crate::error::CliError;

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print one setting (e.g. `backend.url`)
    Get { key: String },

    /// Change one setting and write the file
    Set {
        /// Setting name, `section.key`
        key: String,
        /// New value; an empty string unsets optional settings
        value: String,
    },

    /// Print every setting grouped by section
    List,

    /// Print where the settings file lives
    Path,
}

pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => {
            let key = lookup_key(&key)?;
            println!("{}", display_value(key, &current()));
        }
        ConfigCommands::Set { key, value } => {
            let key = lookup_key(&key)?;
            let mut config = current();
            key.set(&mut config, &value)
                .map_err(|e| CliError::Config(e.to_string()))?;
            config.save()?;
            println!("{} -> {}", key.name(), display_value(key, &config));
        }
        ConfigCommands::List => print_all(&current()),
        ConfigCommands::Path => println!("{}", config_file_path().display()),
    }
    Ok(())
}

/// The file as it stands; an unreadable file lists as defaults.
fn current() -> ConfigFile {
    ConfigFile::load().unwrap_or_default()
}

fn lookup_key(name: &str) -> Result<ConfigKey, CliError> {
    name.parse().map_err(|_| {
        let known: Vec<&str> = ConfigKey::all().iter().map(ConfigKey::name).collect();
        CliError::Config(format!(
            "Unknown setting '{}'. Known settings: {}",
            name,
            known.join(", ")
        ))
    })
}

fn display_value(key: ConfigKey, config: &ConfigFile) -> String {
    let value = key.get(config);
    if value.is_empty() {
        "(not set)".to_string()
    } else if key.is_secret() {
        mask_secret(&value)
    } else {
        value
    }
}

fn print_all(config: &ConfigFile) {
    println!("# {}", config_file_path().display());
    let mut section = None;
    for &key in ConfigKey::all() {
        if section != Some(key.section()) {
            section = Some(key.section());
            println!();
            println!("[{}]", key.section());
        }
        println!("{:<10} {}", key.key_name(), display_value(key, config));
    }
}

/// Keep the last four characters of a secret.
fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    match chars.len() {
        0..=4 => "****".to_string(),
        n => format!("****{}", chars[n - 4..].iter().collect::<String>()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("AIzaSyExample1234"), "****1234");
        assert_eq!(mask_secret("abc"), "****");
    }

    #[test]
    fn test_lookup_key() {
        assert_eq!(lookup_key("backend.url").unwrap(), ConfigKey::BackendUrl);
        match lookup_key("maps.zoom") {
            Err(CliError::Config(msg)) => assert!(msg.contains("maps.api_key")),
            _ => panic!("expected a config error"),
        }
    }

    #[test]
    fn test_display_value() {
        let mut config = ConfigFile::default();
        assert_eq!(display_value(ConfigKey::MapsApiKey, &config), "(not set)");

        config.maps.api_key = Some("AIza-secret-9876".to_string());
        config.backend.url = Some("http://localhost:8000".to_string());
        assert_eq!(display_value(ConfigKey::MapsApiKey, &config), "****9876");
        assert_eq!(
            display_value(ConfigKey::BackendUrl, &config),
            "http://localhost:8000"
        );
    }
}
