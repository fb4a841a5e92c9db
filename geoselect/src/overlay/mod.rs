//! Overlay synchronization: selection state → what the map shows.

mod frame;
mod style;
mod surface;
mod synchronizer;

pub use frame::{OverlayFrame, RenderMode, StyledPolygon};
pub use style::{derive_style, Marker, PolygonStyle, SELECTED_STYLE, UNSELECTED_STYLE};
pub use surface::{HeadlessSurface, MapSurface};
pub use synchronizer::{state_frame, ClickOutcome, OverlaySynchronizer, MAX_COUNTY_MARKERS};
