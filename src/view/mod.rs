//! Views: the window manager's handle on one client window
//!
//! A [`View`] wraps a surface of some kind (only XWayland here) behind a
//! kind-independent interface. Kind-specific behavior is reached through
//! [`ViewOps`], chosen when the view is created and fixed afterwards.

use std::fmt;

use crate::geometry::{Geometry, GeometryCache};
use crate::subscription::SubscriptionSet;
use crate::surface::{SurfaceId, SurfaceLayer, WlSurfaceId};
use crate::xwayland::XwaylandOps;

pub mod collection;
pub mod lifecycle;

pub use collection::ViewCollection;
pub use lifecycle::{Teardown, ViewContext};

/// Identifier of a managed view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// Surface family a view was created from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Xwayland,
}

impl ViewKind {
    /// Operations table for this kind
    pub fn ops(self) -> &'static dyn ViewOps {
        match self {
            ViewKind::Xwayland => &XwaylandOps,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MappedState {
    #[default]
    Unmapped,
    Mapped,
}

/// Entry of the optional per-view transition log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewTransition {
    Mapped,
    Unmapped,
    /// One-time setup on the first map
    Initialized { server_side_decorations: bool },
}

/// Kind-specific operations
pub trait ViewOps: fmt::Debug {
    /// Send `geometry` to the client
    fn configure(&self, view: &View, surfaces: &mut dyn SurfaceLayer, geometry: Geometry);

    /// Ask the client to close
    fn close(&self, view: &View, surfaces: &mut dyn SurfaceLayer);

    /// Hook for the map transition
    fn on_map(&self, view: &mut View, cx: &mut ViewContext<'_>);

    /// Hook for the unmap transition
    fn on_unmap(&self, view: &mut View, cx: &mut ViewContext<'_>);
}

#[derive(Debug)]
pub struct View {
    id: ViewId,
    kind: ViewKind,
    ops: &'static dyn ViewOps,
    surface: SurfaceId,
    x: i32,
    y: i32,
    size: GeometryCache,
    state: MappedState,
    ever_mapped: bool,
    server_side_decorations: Option<bool>,
    /// Only set while mapped
    wl_surface: Option<WlSurfaceId>,
    subscriptions: SubscriptionSet,
    history: Option<Vec<ViewTransition>>,
}

impl View {
    pub(crate) fn new(
        id: ViewId,
        kind: ViewKind,
        surface: SurfaceId,
        subscriptions: SubscriptionSet,
        record_transitions: bool,
    ) -> Self {
        Self {
            id,
            kind,
            ops: kind.ops(),
            surface,
            x: 0,
            y: 0,
            size: GeometryCache::new(),
            state: MappedState::Unmapped,
            ever_mapped: false,
            server_side_decorations: None,
            wl_surface: None,
            subscriptions,
            history: record_transitions.then(Vec::new),
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    pub fn ops(&self) -> &'static dyn ViewOps {
        self.ops
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    /// Cached position plus the size from the last commit
    pub fn geometry(&self) -> Geometry {
        let (width, height) = self.size.size();
        Geometry::new(self.x, self.y, width, height)
    }

    pub fn geometry_cache(&self) -> &GeometryCache {
        &self.size
    }

    pub fn state(&self) -> MappedState {
        self.state
    }

    pub fn is_mapped(&self) -> bool {
        self.state == MappedState::Mapped
    }

    pub fn ever_mapped(&self) -> bool {
        self.ever_mapped
    }

    /// `None` until the first map decided it
    pub fn server_side_decorations(&self) -> Option<bool> {
        self.server_side_decorations
    }

    pub fn wl_surface(&self) -> Option<WlSurfaceId> {
        self.wl_surface
    }

    pub fn subscriptions(&self) -> &SubscriptionSet {
        &self.subscriptions
    }

    /// Recorded transitions, if recording was enabled
    pub fn history(&self) -> Option<&[ViewTransition]> {
        self.history.as_deref()
    }

    /// Send `geometry` through the kind's configure and remember the position
    pub fn configure(&mut self, surfaces: &mut dyn SurfaceLayer, geometry: Geometry) {
        self.x = geometry.x;
        self.y = geometry.y;
        self.ops.configure(self, surfaces, geometry);
    }

    pub fn close(&self, surfaces: &mut dyn SurfaceLayer) {
        self.ops.close(self, surfaces);
    }

    fn record(&mut self, transition: ViewTransition) {
        if let Some(history) = self.history.as_mut() {
            history.push(transition);
        }
    }
}
