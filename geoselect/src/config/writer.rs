//! [`ConfigFile`] → commented INI text.

use super::keys::ConfigKey;
use super::settings::ConfigFile;

/// Render the whole file. Values are written in [`ConfigKey::get`] form.
pub(super) fn to_config_string(config: &ConfigFile) -> String {

    format!(
        r#"[maps]
; Google Maps API key used for the map and for geocoding.
; Without it the map is disabled and only the checklist works.
api_key = {}

[backend]
; Base URL of the selections backend (e.g. http://localhost:8000)
; Saving and listing selections are disabled while this is empty.
url = {}

[boundaries]
; GeoJSON FeatureCollection with one feature per state and a "name" property
url = {}

[logging]
; Log file, cleared at the start of every session
file = {}
"#,
        ConfigKey::MapsApiKey.get(config),
        ConfigKey::BackendUrl.get(config),
        ConfigKey::BoundariesUrl.get(config),
        ConfigKey::LoggingFile.get(config),
    )
}
