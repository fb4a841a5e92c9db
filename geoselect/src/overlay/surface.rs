//! Rendering targets for overlay frames.

use std::sync::Arc;

use parking_lot::Mutex;

use super::frame::OverlayFrame;

/// Something that can draw an [`OverlayFrame`].
///
/// Each frame is complete; implementations replace everything they drew
/// for the previous frame.
pub trait MapSurface: Send + Sync {
    fn render(&self, frame: &OverlayFrame);
}

/// Surface that keeps the last frame in memory.
///
/// Used by hosts without a graphical map (the CLI reads it back for
/// display) and by tests.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    last: Arc<Mutex<OverlayFrame>>,
    renders: Arc<Mutex<usize>>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> OverlayFrame {
        self.last.lock().clone()
    }

    pub fn render_count(&self) -> usize {
        *self.renders.lock()
    }
}

impl MapSurface for HeadlessSurface {
    fn render(&self, frame: &OverlayFrame) {
        *self.last.lock() = frame.clone();
        *self.renders.lock() += 1;
    }
}
