//! GeoSelect - geographic selection and overlay synchronization for US states and counties
//!
//! This library maintains a selection of states or counties, resolves map
//! clicks to geographic codes through asynchronous geocoding, keeps map
//! overlays consistent with the selection, and saves named selections to a
//! REST backend.
//!
//! # High-Level API
//!
//! The [`engine`] module provides the facade a host drives:
//!
//! ```ignore
//! use std::sync::Arc;
//! use geoselect::config::{ConfigResolver, IniConfigStore};
//! use geoselect::engine::DefaultEngine;
//! use geoselect::overlay::HeadlessSurface;
//!
//! let store = Arc::new(IniConfigStore::default_location());
//! let config = Arc::new(ConfigResolver::new(store, None));
//! let engine = DefaultEngine::with_defaults(config, HeadlessSurface::new(), boundary_url)?;
//!
//! engine.ensure_provider_initialized().await?;
//! engine.handle_click(LatLng::new(37.77, -122.42)).await?;
//! ```

pub mod config;
pub mod engine;
pub mod geometry;
pub mod http;
pub mod logging;
pub mod notice;
pub mod overlay;
pub mod persistence;
pub mod region;
pub mod selection;

/// Version of the GeoSelect library and CLI.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
