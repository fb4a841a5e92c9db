//! Polygon styles and marker records.

use crate::geometry::{BoundaryFeature, LatLng};
use crate::region::{Code, Level};
use crate::selection::SelectionSnapshot;

/// Fill and stroke of a state polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonStyle {
    pub fill_color: &'static str,
    pub fill_opacity: f32,
    pub stroke_color: &'static str,
    pub stroke_weight: f32,
}

pub const SELECTED_STYLE: PolygonStyle = PolygonStyle {
    fill_color: "#1d4ed8",
    fill_opacity: 0.55,
    stroke_color: "#1e3a8a",
    stroke_weight: 2.0,
};

pub const UNSELECTED_STYLE: PolygonStyle = PolygonStyle {
    fill_color: "#93c5fd",
    fill_opacity: 0.15,
    stroke_color: "#3b82f6",
    stroke_weight: 1.0,
};

/// Style for `feature` given the current level and selection.
///
/// Pure: the same inputs always give the same style. Features without a
/// code, or any feature outside state level, are drawn unselected.
pub fn derive_style(
    level: Level,
    selection: &SelectionSnapshot,
    feature: &BoundaryFeature,
) -> PolygonStyle {
    match (&feature.code, level) {
        (Some(code), Level::State) if selection.contains(code) => SELECTED_STYLE,
        _ => UNSELECTED_STYLE,
    }
}

/// A county marker. Presence implies the code is selected.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub code: Code,
    pub position: LatLng,
    /// Hover title; always the code itself.
    pub title: String,
}

impl Marker {
    pub fn new(code: Code, position: LatLng) -> Self {
        let title = code.to_string();
        Self {
            code,
            position,
            title,
        }
    }
}
