//! CLI runner for common setup and operations.
//!
//! Encapsulates logging initialization, configuration resolution and engine
//! creation to reduce duplication across command handlers.

use std::io::IsTerminal;
use std::sync::Arc;

use geoselect::config::{ConfigFile, ConfigResolver, IniConfigStore};
use geoselect::engine::DefaultEngine;
use geoselect::logging::{init_logging, LoggingGuard, LoggingOptions};
use geoselect::overlay::MapSurface;
use tokio::runtime::Runtime;
use tracing::info;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
    launch_url: Option<String>,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    ///
    /// When stdout is a TTY, stdout logging is disabled so log lines do not
    /// interleave with interactive output.
    ///
    /// # Arguments
    ///
    /// * `debug_mode` - When true, enables debug-level logging regardless of RUST_LOG
    /// * `launch_url` - Optional URL whose query string overrides persisted settings
    pub fn new(debug_mode: bool, launch_url: Option<String>) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let options = LoggingOptions {
            file: config.logging.file.clone(),
            stdout: !std::io::stdout().is_terminal(),
            debug: debug_mode,
        };
        let logging_guard =
            init_logging(&options).map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
            launch_url,
        })
    }

    /// Get the loaded configuration file.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("GeoSelect v{}", geoselect::VERSION);
        info!("GeoSelect CLI: {} command", command);
    }

    /// Resolve the effective configuration from all layers.
    pub fn resolver(&self) -> Arc<ConfigResolver> {
        let store = Arc::new(IniConfigStore::default_location());
        Arc::new(ConfigResolver::new(store, self.launch_url.as_deref()))
    }

    /// Create an engine drawing onto `surface`.
    pub fn create_engine<S: MapSurface>(&self, surface: S) -> Result<DefaultEngine<S>, CliError> {
        let engine =
            DefaultEngine::with_defaults(self.resolver(), surface, &self.config.boundaries.url)?;
        info!(
            map = engine.config().has_api_key(),
            backend = engine.config().has_backend(),
            "Engine created"
        );
        Ok(engine)
    }

    /// Build the single-threaded runtime commands run on.
    pub fn runtime(&self) -> Result<Runtime, CliError> {
        Ok(tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?)
    }
}
