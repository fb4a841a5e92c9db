//! Overlay synchronizer.
//!
//! Derives the overlay from the selection store and the loaded geometry,
//! and is the single dispatch point that turns map clicks into store
//! mutations.
//!
//! # Modes
//!
//! - **State**: boundary polygons, loaded lazily once, restyled from scratch
//!   on every pass.
//! - **County**: one marker per selected code, positioned by forward
//!   geocoding. At most [`MAX_COUNTY_MARKERS`] markers per pass, and at most
//!   that many lookups in flight across overlapping passes; positions are
//!   cached for the session.
//!
//! # Stale results
//!
//! Every asynchronous lookup carries the selection generation it was issued
//! under. Results arriving after a level switch or clear are not applied.

use std::collections::HashMap;

use futures::stream::{FuturesUnordered, StreamExt};
use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tracing::{debug, info, trace};

use super::frame::{OverlayFrame, RenderMode, StyledPolygon};
use super::style::{derive_style, Marker};
use super::surface::MapSurface;
use crate::geometry::{Boundaries, Geocoder, GeometryAdapter, HitTest, LatLng};
use crate::http::AsyncHttpClient;
use crate::region::{Code, Level};
use crate::selection::{SelectionSnapshot, SharedSelection};

/// Upper bound on county markers drawn per pass and on lookups in flight.
pub const MAX_COUNTY_MARKERS: usize = 12;

/// What a click did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Exactly one code was toggled.
    Toggled { code: Code, selected: bool },
    /// Resolved, but the selection was invalidated while resolving.
    Discarded,
    /// No code found; a notice has been posted.
    Unresolved,
}

/// Keeps a [`MapSurface`] consistent with the selection.
pub struct OverlaySynchronizer<C: AsyncHttpClient, G: Geocoder, S: MapSurface> {
    selection: SharedSelection,
    adapter: GeometryAdapter<C, G>,
    surface: S,
    frame: Mutex<OverlayFrame>,
    /// Resolved marker positions, kept for the session.
    positions: Mutex<HashMap<Code, LatLng>>,
    /// Lookups in flight, with the generation they were issued under.
    pending: Mutex<HashMap<Code, u64>>,
    /// One permit per forward lookup, shared by every pass.
    lookup_slots: Semaphore,
}

impl<C: AsyncHttpClient, G: Geocoder, S: MapSurface> OverlaySynchronizer<C, G, S> {
    pub fn new(selection: SharedSelection, adapter: GeometryAdapter<C, G>, surface: S) -> Self {
        Self {
            selection,
            adapter,
            surface,
            frame: Mutex::new(OverlayFrame::empty()),
            positions: Mutex::new(HashMap::new()),
            pending: Mutex::new(HashMap::new()),
            lookup_slots: Semaphore::new(MAX_COUNTY_MARKERS),
        }
    }

    pub fn adapter(&self) -> &GeometryAdapter<C, G> {
        &self.adapter
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn selection(&self) -> &SharedSelection {
        &self.selection
    }

    /// The frame most recently sent to the surface.
    pub fn frame(&self) -> OverlayFrame {
        self.frame.lock().clone()
    }

    pub fn mode(&self) -> RenderMode {
        self.frame.lock().mode
    }

    /// Cached marker position for a county code.
    pub fn cached_position(&self, code: &Code) -> Option<LatLng> {
        self.positions.lock().get(code).copied()
    }

    /// Bring the overlay in line with the current selection.
    pub async fn sync(&self) {
        match self.selection.level() {
            Level::State => self.sync_state().await,
            Level::County => self.sync_county().await,
        }
    }

    async fn sync_state(&self) {
        // Failure is reported by the adapter; polygons are simply absent.
        let boundaries = self.adapter.load_boundaries().await.ok();

        // Read the store after the await so the freshest state is drawn.
        let snapshot = self.selection.snapshot();
        if snapshot.level != Level::State {
            debug!(generation = snapshot.generation, "Level changed during boundary load");
            return;
        }

        self.publish(state_frame(&snapshot, boundaries));
    }

    async fn sync_county(&self) {
        let snapshot = self.selection.snapshot();
        let generation = snapshot.generation;

        let drawn: Vec<Code> = snapshot
            .items
            .iter()
            .take(MAX_COUNTY_MARKERS)
            .cloned()
            .collect();
        if snapshot.items.len() > MAX_COUNTY_MARKERS {
            debug!(
                selected = snapshot.items.len(),
                drawn = MAX_COUNTY_MARKERS,
                "Marker cap reached"
            );
        }

        let mut to_lookup = Vec::new();
        {
            let positions = self.positions.lock();
            let mut pending = self.pending.lock();
            for code in &drawn {
                if positions.contains_key(code) || pending.get(code) == Some(&generation) {
                    continue;
                }
                pending.insert(code.clone(), generation);
                to_lookup.push(code.clone());
            }
        }

        self.publish(self.county_frame(&snapshot));

        if to_lookup.is_empty() {
            return;
        }
        debug!(lookups = to_lookup.len(), generation, "Placing county markers");

        let mut lookups: FuturesUnordered<_> = to_lookup
            .into_iter()
            .map(|code| async move {
                // The semaphore is never closed.
                let _slot = self.lookup_slots.acquire().await.ok();
                let result = self.adapter.locate_county(&code).await;
                (code, result)
            })
            .collect();

        while let Some((code, result)) = lookups.next().await {
            {
                let mut pending = self.pending.lock();
                if pending.get(&code) == Some(&generation) {
                    pending.remove(&code);
                }
            }

            let Ok(position) = result else {
                continue;
            };
            self.positions.lock().insert(code.clone(), position);

            if !self.selection.is_current(generation) {
                debug!(code = %code, generation, "Discarding stale marker position");
                continue;
            }

            trace!(code = %code, position = %position, "Marker position resolved");
            let snapshot = self.selection.snapshot();
            if snapshot.level == Level::County {
                self.publish(self.county_frame(&snapshot));
            }
        }
    }

    fn county_frame(&self, snapshot: &SelectionSnapshot) -> OverlayFrame {
        let positions = self.positions.lock();
        let markers = snapshot
            .items
            .iter()
            .take(MAX_COUNTY_MARKERS)
            .filter_map(|code| {
                positions
                    .get(code)
                    .map(|position| Marker::new(code.clone(), *position))
            })
            .collect();

        OverlayFrame {
            mode: RenderMode::CountyMode,
            boundaries: None,
            polygons: Vec::new(),
            markers,
        }
    }

    fn publish(&self, frame: OverlayFrame) {
        let mut current = self.frame.lock();
        trace!(
            mode = %frame.mode,
            polygons = frame.polygons.len(),
            markers = frame.markers.len(),
            "Rendering overlay frame"
        );
        self.surface.render(&frame);
        *current = frame;
    }

    /// Remove every overlay element right away.
    fn teardown(&self) {
        self.publish(OverlayFrame::empty());
    }

    /// Toggle a code from the checklist and redraw.
    pub async fn toggle(&self, code: Code) -> bool {
        let selected = self.selection.toggle(code);
        self.sync().await;
        selected
    }

    /// Switch level: tear down the old overlay, clear, then draw the new mode.
    pub async fn set_level(&self, level: Level) {
        self.teardown();
        self.selection.set_level(level);
        info!(level = %level, "Level switched");
        self.sync().await;
    }

    /// Empty the selection and redraw.
    pub async fn clear(&self) {
        self.selection.clear();
        self.sync().await;
    }

    /// Single dispatch point for map clicks.
    ///
    /// At state level a click inside a coded polygon toggles that polygon's
    /// code. Anything else falls through to reverse geocoding. Either way at
    /// most one toggle happens per click.
    pub async fn handle_click(&self, point: LatLng) -> ClickOutcome {
        if !point.is_valid() {
            debug!(point = %point, "Ignoring click outside WGS84 bounds");
            return ClickOutcome::Unresolved;
        }

        let snapshot = self.selection.snapshot();
        let level = snapshot.level;
        let generation = snapshot.generation;

        if level == Level::State {
            if let HitTest::Feature { code } = self.adapter.hit_test(point) {
                debug!(code = %code, "Polygon click");
                let selected = self.toggle(code.clone()).await;
                return ClickOutcome::Toggled { code, selected };
            }
        }

        let code = match self.adapter.resolve_point(point, level).await {
            Ok(code) => code,
            Err(_) => return ClickOutcome::Unresolved,
        };

        if !self.selection.is_current(generation) {
            debug!(code = %code, generation, "Discarding stale click resolution");
            return ClickOutcome::Discarded;
        }

        let selected = self.toggle(code.clone()).await;
        ClickOutcome::Toggled { code, selected }
    }
}

/// Build a state-mode frame. Pure over its inputs.
pub fn state_frame(snapshot: &SelectionSnapshot, boundaries: Option<Boundaries>) -> OverlayFrame {
    let polygons = boundaries
        .as_ref()
        .map(|features| {
            features
                .iter()
                .enumerate()
                .map(|(feature_index, feature)| StyledPolygon {
                    feature_index,
                    name: feature.name.clone(),
                    code: feature.code.clone(),
                    style: derive_style(snapshot.level, snapshot, feature),
                })
                .collect()
        })
        .unwrap_or_default();

    OverlayFrame {
        mode: RenderMode::StateMode,
        boundaries,
        polygons,
        markers: Vec::new(),
    }
}
