//! Helpers shared by command handlers.

use geoselect::notice::{Notice, NoticeSeverity};
use geoselect::overlay::OverlayFrame;
use geoselect::persistence::SavedSelection;
use geoselect::region::{Code, Level};

use crate::error::CliError;

/// Parse a level argument.
pub fn parse_level(value: &str) -> Result<Level, CliError> {
    value
        .parse()
        .map_err(|_| CliError::Input(format!("Unknown level '{}'. Use 'state' or 'county'.", value)))
}

/// Parse a latitude/longitude pair.
pub fn parse_coordinate(lat: &str, lng: &str) -> Result<(f64, f64), CliError> {
    let parse = |label: &str, value: &str| {
        value
            .parse::<f64>()
            .map_err(|_| CliError::Input(format!("Invalid {} '{}'", label, value)))
    };
    Ok((parse("latitude", lat)?, parse("longitude", lng)?))
}

/// Normalize a user-typed code: state abbreviations are upper-cased.
pub fn normalize_code(value: &str) -> Code {
    Code::new(value.trim().to_ascii_uppercase())
}

/// Render a list of codes, or `(none)`.
pub fn format_codes(codes: &[Code]) -> String {
    if codes.is_empty() {
        return "(none)".to_string();
    }
    codes
        .iter()
        .map(Code::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_notice(notice: &Notice) -> String {
    match notice.severity {
        NoticeSeverity::Transient => format!("note: {}", notice.message),
        NoticeSeverity::Blocking => format!("! {} (type 'dismiss' to clear)", notice.message),
    }
}

/// One-line summary of an overlay frame.
pub fn format_frame(frame: &OverlayFrame) -> String {
    if frame.is_empty() {
        return format!("map: {} (nothing drawn)", frame.mode);
    }
    let selected = format_codes(&frame.selected_codes());
    if frame.markers.is_empty() {
        format!(
            "map: {}, {} polygons, selected: {}",
            frame.mode,
            frame.polygons.len(),
            selected
        )
    } else {
        let markers = frame
            .markers
            .iter()
            .map(|m| format!("{} @ {}", m.title, m.position))
            .collect::<Vec<_>>()
            .join("; ");
        format!("map: {}, markers: {}", frame.mode, markers)
    }
}

/// Print saved selections as a table.
pub fn print_saved(list: &[SavedSelection]) {
    if list.is_empty() {
        println!("No saved selections.");
        return;
    }
    println!("{:>6}  {:<24} {:<7} Items", "ID", "Name", "Level");
    for saved in list {
        println!(
            "{:>6}  {:<24} {:<7} {}",
            saved.id,
            saved.name,
            saved.level,
            format_codes(&saved.items)
        );
    }
}
