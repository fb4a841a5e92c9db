//! Configuration for GeoSelect.
//!
//! Two layers live here:
//!
//! - the persisted INI file at `~/.geoselect/config.ini` ([`ConfigFile`],
//!   accessed by key through [`ConfigKey`])
//! - the runtime [`Configuration`] produced by [`ConfigResolver`] from the
//!   build environment, the persisted file and the launch URL

mod file;
mod keys;
mod parser;
mod resolver;
mod settings;
mod store;
mod writer;

pub use file::{config_directory, config_file_path, default_log_file, ConfigFileError, HOME_ENV};
pub use keys::{ConfigKey, ConfigKeyError};
pub use resolver::{
    build_time_layer, launch_url_layer, resolve_value, ConfigLayer, ConfigResolver,
    URL_PARAM_API_KEY, URL_PARAM_BACKEND,
};
pub use settings::{
    BackendSettings, BoundariesSettings, ConfigFile, ConfigPatch, Configuration, LoggingSettings,
    MapsSettings,
};
pub use store::{ConfigStore, IniConfigStore, MemoryConfigStore};
