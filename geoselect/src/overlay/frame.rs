//! Complete overlay state handed to the map surface.

use std::fmt;
use std::sync::Arc;

use super::style::{Marker, PolygonStyle};
use crate::geometry::BoundaryFeature;
use crate::region::Code;

/// Which overlay layer is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Nothing synchronized yet, or torn down during a level switch.
    #[default]
    Idle,
    /// Styled state polygons.
    StateMode,
    /// Point markers for selected counties.
    CountyMode,
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderMode::Idle => "idle",
            RenderMode::StateMode => "state",
            RenderMode::CountyMode => "county",
        };
        f.write_str(name)
    }
}

/// One drawn polygon: an index into the frame's boundary set plus its style.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledPolygon {
    pub feature_index: usize,
    pub name: String,
    pub code: Option<Code>,
    pub style: PolygonStyle,
}

/// Everything the surface should show, replacing whatever it showed before.
#[derive(Debug, Clone, Default)]
pub struct OverlayFrame {
    pub mode: RenderMode,
    /// Geometry the polygon indices refer to. `None` outside state mode.
    pub boundaries: Option<Arc<Vec<BoundaryFeature>>>,
    pub polygons: Vec<StyledPolygon>,
    pub markers: Vec<Marker>,
}

impl OverlayFrame {
    /// The empty frame used for teardown.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty() && self.markers.is_empty()
    }

    /// Codes drawn as selected (selected-style polygons or markers).
    pub fn selected_codes(&self) -> Vec<Code> {
        match self.mode {
            RenderMode::StateMode => self
                .polygons
                .iter()
                .filter(|p| p.style == super::style::SELECTED_STYLE)
                .filter_map(|p| p.code.clone())
                .collect(),
            RenderMode::CountyMode => self.markers.iter().map(|m| m.code.clone()).collect(),
            RenderMode::Idle => Vec::new(),
        }
    }

    pub fn marker(&self, code: &Code) -> Option<&Marker> {
        self.markers.iter().find(|m| &m.code == code)
    }
}
