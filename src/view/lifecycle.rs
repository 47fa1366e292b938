//! View lifecycle state machine
//!
//! ```text
//! created ──map──► mapped ──unmap──► unmapped ──map──► mapped ...
//!    │                │                  │
//!    └────────────────┴─────destroy──────┴──► destroyed
//! ```
//!
//! Every handler runs to completion on the dispatcher thread. Sequencing
//! defects (a second map without an unmap, a commit without a bound
//! surface) abort instead of being reported: the surface layer guarantees
//! they cannot happen, so continuing would act on undefined state.

use log::{debug, info, trace, warn};

use crate::decoration::{DecorationMode, DecorationPolicy};
use crate::geometry::Geometry;
use crate::policy::{FocusPolicy, PlacementPolicy};
use crate::signals::SignalBus;
use crate::subscription::ReleaseReport;
use crate::surface::{SurfaceLayer, WlSurfaceId};

use super::{MappedState, View, ViewId, ViewTransition};

/// Everything a transition may touch besides the view itself
pub struct ViewContext<'a> {
    pub bus: &'a mut SignalBus,
    pub surfaces: &'a mut dyn SurfaceLayer,
    pub placement: &'a mut dyn PlacementPolicy,
    pub focus: &'a mut dyn FocusPolicy,
    pub decorations: DecorationPolicy,
    /// Mapped views, newest first, as of the start of the event
    pub mapped: &'a [ViewId],
}

/// Surface state captured when a view maps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapParams {
    pub position: (i32, i32),
    pub wl_surface: WlSurfaceId,
    pub decorations: DecorationMode,
    /// Geometry the client mapped with, handed to the placement policy
    pub requested: Geometry,
}

/// Result of the destroy transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Teardown {
    pub view: ViewId,
    pub released: ReleaseReport,
    /// Destroy arrived while mapped and an unmap was run first
    pub implicit_unmap: bool,
}

impl View {
    pub(crate) fn handle_map(&mut self, cx: &mut ViewContext<'_>) {
        trace!("{} map", self.id);
        let ops = self.ops;
        ops.on_map(self, cx);
    }

    pub(crate) fn handle_unmap(&mut self, cx: &mut ViewContext<'_>) {
        trace!("{} unmap", self.id);
        let ops = self.ops;
        ops.on_unmap(self, cx);
    }

    /// Refresh the cached size from the bound surface
    pub(crate) fn handle_commit(&mut self, surfaces: &dyn SurfaceLayer) {
        let Some(wl_surface) = self.wl_surface else {
            panic!("{} received a commit with no bound surface", self.id);
        };
        let Some((width, height)) = surfaces.committed_size(wl_surface) else {
            panic!("{} bound to {} which no longer exists", self.id, wl_surface);
        };
        self.size.refresh(width, height);
        trace!("{} committed {}x{}", self.id, width, height);
    }

    /// Final transition. Consumes the view; every subscription goes back to
    /// the bus here.
    pub(crate) fn handle_destroy(mut self, cx: &mut ViewContext<'_>) -> Teardown {
        let implicit_unmap = self.is_mapped();
        if implicit_unmap {
            warn!("⚠️ {} destroyed while mapped, unmapping first", self.id);
            let ops = self.ops;
            ops.on_unmap(&mut self, cx);
        }

        let View {
            id, subscriptions, ..
        } = self;
        let released = subscriptions.release(cx.bus);
        info!(
            "🗑️ {} destroyed, {} subscriptions released",
            id,
            released.total()
        );

        Teardown {
            view: id,
            released,
            implicit_unmap,
        }
    }

    /// Unmapped → Mapped. Binds the surface, runs one-time setup on the
    /// first map, starts listening to commits and takes focus.
    pub fn enter_mapped(&mut self, cx: &mut ViewContext<'_>, params: MapParams) {
        assert_eq!(
            self.state,
            MappedState::Unmapped,
            "{} mapped twice without an unmap",
            self.id
        );

        self.state = MappedState::Mapped;
        (self.x, self.y) = params.position;
        self.wl_surface = Some(params.wl_surface);
        self.record(ViewTransition::Mapped);

        if !self.ever_mapped {
            self.initialize(cx, &params);
        }

        self.subscriptions
            .attach_commit(cx.bus, params.wl_surface, self.id);

        cx.focus.focus(Some(self.id));
        debug!(
            "👁️ {} mapped at ({}, {}) on {}",
            self.id, self.x, self.y, params.wl_surface
        );
    }

    /// Mapped → Unmapped. The commit listener goes before the surface
    /// handle does.
    pub fn leave_mapped(&mut self, cx: &mut ViewContext<'_>) {
        assert_eq!(
            self.state,
            MappedState::Mapped,
            "{} unmapped while not mapped",
            self.id
        );

        self.state = MappedState::Unmapped;
        self.subscriptions.detach_commit(cx.bus);
        self.wl_surface = None;
        self.record(ViewTransition::Unmapped);

        let next = cx.focus.next(self.id, cx.mapped);
        cx.focus.focus(next);
        debug!("👁️‍🗨️ {} unmapped, focus moves to {:?}", self.id, next);
    }

    fn initialize(&mut self, cx: &mut ViewContext<'_>, params: &MapParams) {
        let server_side = cx.decorations.wants_server_side(params.decorations);
        self.server_side_decorations = Some(server_side);

        if let Some((x, y)) = cx.placement.initial_position(self, params.requested) {
            if (x, y) != (self.x, self.y) {
                let geometry = Geometry::new(x, y, params.requested.width, params.requested.height);
                self.configure(cx.surfaces, geometry);
            }
        }

        self.ever_mapped = true;
        self.record(ViewTransition::Initialized {
            server_side_decorations: server_side,
        });
        info!(
            "🪟 {} first map, server-side decorations: {}",
            self.id, server_side
        );
    }
}
