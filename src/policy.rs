//! Window-manager policies the view core calls out to
//!
//! Placement, focus selection and unmanaged-surface tracking belong to the
//! rest of the window manager. The traits here are the seams; the structs
//! are the small default implementations the headless server ships with.

use std::collections::BTreeSet;

use log::debug;

use crate::config::PlacementConfig;
use crate::geometry::Geometry;
use crate::surface::SurfaceId;
use crate::view::{View, ViewId};

/// Chooses where a view appears the first time it is mapped
pub trait PlacementPolicy {
    /// `requested` is the geometry the client mapped with. Returning `None`
    /// confirms the client's own position.
    fn initial_position(&mut self, view: &View, requested: Geometry) -> Option<(i32, i32)>;
}

/// Moves keyboard focus between views
pub trait FocusPolicy {
    /// Focus `view`, or nothing
    fn focus(&mut self, view: Option<ViewId>);

    /// View to focus after `current` goes away. `mapped` lists the mapped
    /// views, newest first, and may still contain `current`.
    fn next(&self, current: ViewId, mapped: &[ViewId]) -> Option<ViewId>;

    fn focused(&self) -> Option<ViewId>;
}

/// Receives override-redirect surfaces, which never become views
pub trait UnmanagedTracker {
    fn adopt(&mut self, surface: SurfaceId);

    /// The surface was destroyed. `false` if it was never adopted.
    fn forget(&mut self, surface: SurfaceId) -> bool;
}

/// Keeps the position the client asked for
#[derive(Debug, Default, Clone, Copy)]
pub struct ClientPlacement;

impl PlacementPolicy for ClientPlacement {
    fn initial_position(&mut self, _view: &View, _requested: Geometry) -> Option<(i32, i32)> {
        None
    }
}

/// Centers new views on a single output
#[derive(Debug, Clone, Copy)]
pub struct CenterPlacement {
    output_width: u32,
    output_height: u32,
}

impl CenterPlacement {
    pub fn new(output_width: u32, output_height: u32) -> Self {
        Self {
            output_width,
            output_height,
        }
    }
}

impl PlacementPolicy for CenterPlacement {
    fn initial_position(&mut self, view: &View, requested: Geometry) -> Option<(i32, i32)> {
        let x = (i64::from(self.output_width) - i64::from(requested.width)) / 2;
        let y = (i64::from(self.output_height) - i64::from(requested.height)) / 2;
        let position = (x.max(0) as i32, y.max(0) as i32);
        debug!("📍 Centering {} at {:?}", view.id(), position);
        Some(position)
    }
}

/// Build the placement policy named in the configuration
pub fn placement_from_config(config: &PlacementConfig) -> Box<dyn PlacementPolicy> {
    match config.mode.as_str() {
        "center" => Box::new(CenterPlacement::new(
            config.output_width,
            config.output_height,
        )),
        _ => Box::new(ClientPlacement),
    }
}

/// Tracks the focused view, optionally with a log of every focus change
#[derive(Debug, Default)]
pub struct FocusStack {
    focused: Option<ViewId>,
    history: Option<Vec<Option<ViewId>>>,
}

impl FocusStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also keep every focus change, most recent last
    pub fn recording() -> Self {
        Self {
            focused: None,
            history: Some(Vec::new()),
        }
    }

    pub fn history(&self) -> Option<&[Option<ViewId>]> {
        self.history.as_deref()
    }
}

impl FocusPolicy for FocusStack {
    fn focus(&mut self, view: Option<ViewId>) {
        self.focused = view;
        if let Some(history) = self.history.as_mut() {
            history.push(view);
        }
    }

    /// The mapped view following `current` in stacking order, wrapping
    /// around; the newest mapped view when `current` is not in the list
    fn next(&self, current: ViewId, mapped: &[ViewId]) -> Option<ViewId> {
        let start = mapped
            .iter()
            .position(|id| *id == current)
            .map_or(0, |index| index + 1);
        mapped
            .iter()
            .cycle()
            .skip(start)
            .take(mapped.len())
            .copied()
            .find(|id| *id != current)
    }

    fn focused(&self) -> Option<ViewId> {
        self.focused
    }
}

/// Live override-redirect surfaces handed over by the intake router
#[derive(Debug, Default)]
pub struct UnmanagedSurfaces {
    surfaces: BTreeSet<SurfaceId>,
}

impl UnmanagedSurfaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, surface: SurfaceId) -> bool {
        self.surfaces.contains(&surface)
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

impl UnmanagedTracker for UnmanagedSurfaces {
    fn adopt(&mut self, surface: SurfaceId) {
        debug!("🫥 Tracking unmanaged {}", surface);
        self.surfaces.insert(surface);
    }

    fn forget(&mut self, surface: SurfaceId) -> bool {
        self.surfaces.remove(&surface)
    }
}
