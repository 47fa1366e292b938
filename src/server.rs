//! The view server: owner of the global view collection and the single
//! dispatcher every surface event goes through.
//!
//! Events are handled one at a time, to completion. Apart from new-surface
//! notifications and the destroy of an unmanaged surface, an event only
//! reaches views that hold a listener for it on the [`SignalBus`]; anything
//! else is dropped.

use log::{debug, info, trace, warn};

use crate::config::XwmConfig;
use crate::decoration::DecorationPolicy;
use crate::geometry::Geometry;
use crate::policy::{
    placement_from_config, FocusPolicy, FocusStack, PlacementPolicy, UnmanagedSurfaces,
    UnmanagedTracker,
};
use crate::signals::{Signal, SignalBus, SignalSource};
use crate::surface::{SurfaceId, SurfaceLayer, WlSurfaceId};
use crate::view::{Teardown, View, ViewCollection, ViewContext, ViewId};
use crate::xwayland::{
    ConfigureAckHandler, ConfigureRequest, Intake, IntakeContext, SurfaceIntakeRouter,
};

/// Notifications from the XWayland surface layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    NewSurface {
        surface: SurfaceId,
        override_redirect: bool,
    },
    Map {
        surface: SurfaceId,
    },
    Unmap {
        surface: SurfaceId,
    },
    Destroy {
        surface: SurfaceId,
    },
    RequestConfigure {
        surface: SurfaceId,
        request: ConfigureRequest,
    },
    Commit {
        surface: WlSurfaceId,
    },
}

/// Server statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServerStats {
    pub views_created: u64,
    pub views_destroyed: u64,
    pub unmanaged_handoffs: u64,
    pub configure_acks: u64,
    pub commits: u64,
    pub dropped_events: u64,
    pub live_views: usize,
}

pub struct Server<S: SurfaceLayer> {
    config: XwmConfig,
    surfaces: S,
    bus: SignalBus,
    views: ViewCollection,
    router: SurfaceIntakeRouter,
    configure_ack: ConfigureAckHandler,
    decorations: DecorationPolicy,
    placement: Box<dyn PlacementPolicy>,
    focus: Box<dyn FocusPolicy>,
    unmanaged: Box<dyn UnmanagedTracker>,
    /// Listener buffer reused across events
    scratch: Vec<ViewId>,
    last_teardown: Option<Teardown>,
    /// Only kept when transitions are recorded
    teardowns: Option<Vec<Teardown>>,
    stats: ServerStats,
}

impl<S: SurfaceLayer> Server<S> {
    /// Create a server with the default policies for `config`
    pub fn new(config: XwmConfig, surfaces: S) -> Self {
        info!("🏗️ Initializing XWayland view server");
        let record = config.debug.record_transitions;
        Self {
            router: SurfaceIntakeRouter::new(&config),
            configure_ack: ConfigureAckHandler,
            decorations: DecorationPolicy::new(&config.decorations),
            placement: placement_from_config(&config.placement),
            focus: Box::new(if record {
                FocusStack::recording()
            } else {
                FocusStack::new()
            }),
            unmanaged: Box::new(UnmanagedSurfaces::new()),
            config,
            surfaces,
            bus: SignalBus::new(),
            views: ViewCollection::new(),
            scratch: Vec::new(),
            last_teardown: None,
            teardowns: record.then(Vec::new),
            stats: ServerStats::default(),
        }
    }

    pub fn with_placement(mut self, placement: Box<dyn PlacementPolicy>) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_focus(mut self, focus: Box<dyn FocusPolicy>) -> Self {
        self.focus = focus;
        self
    }

    pub fn with_unmanaged(mut self, unmanaged: Box<dyn UnmanagedTracker>) -> Self {
        self.unmanaged = unmanaged;
        self
    }

    /// Handle one surface event to completion
    pub fn dispatch(&mut self, event: SurfaceEvent) {
        let delivered = match event {
            SurfaceEvent::NewSurface {
                surface,
                override_redirect,
            } => self.handle_new_surface(surface, override_redirect),
            SurfaceEvent::Map { surface } => {
                self.deliver(SignalSource::XSurface(surface), Signal::Map, |server, id| {
                    server.with_view(id, View::handle_map)
                })
            }
            SurfaceEvent::Unmap { surface } => {
                self.deliver(SignalSource::XSurface(surface), Signal::Unmap, |server, id| {
                    server.with_view(id, View::handle_unmap)
                })
            }
            SurfaceEvent::Destroy { surface } => {
                let managed = self.deliver(
                    SignalSource::XSurface(surface),
                    Signal::Destroy,
                    Self::destroy_view,
                );
                managed || self.forget_unmanaged(surface)
            }
            SurfaceEvent::RequestConfigure { surface, request } => self.deliver(
                SignalSource::XSurface(surface),
                Signal::RequestConfigure,
                move |server, id| {
                    let Some(view) = server.views.get(id) else {
                        panic!("{} listening to {} but not in the collection", id, surface);
                    };
                    server
                        .configure_ack
                        .acknowledge(view, &mut server.surfaces, request);
                    server.stats.configure_acks += 1;
                },
            ),
            SurfaceEvent::Commit { surface } => self.deliver(
                SignalSource::WlSurface(surface),
                Signal::Commit,
                |server, id| {
                    let Some(view) = server.views.get_mut(id) else {
                        panic!("{} listening to {} but not in the collection", id, surface);
                    };
                    view.handle_commit(&server.surfaces);
                    server.stats.commits += 1;
                },
            ),
        };

        if !delivered {
            trace!("Dropping {:?}: no listeners", event);
            self.stats.dropped_events += 1;
        }
    }

    /// Ask the client behind `id` to close. `false` if there is no such view.
    pub fn close_view(&mut self, id: ViewId) -> bool {
        match self.views.get(id) {
            Some(view) => {
                view.close(&mut self.surfaces);
                true
            }
            None => false,
        }
    }

    /// Compositor-initiated configure. `false` if there is no such view.
    pub fn configure_view(&mut self, id: ViewId, geometry: Geometry) -> bool {
        match self.views.get_mut(id) {
            Some(view) => {
                view.configure(&mut self.surfaces, geometry);
                true
            }
            None => false,
        }
    }

    pub fn view(&self, id: ViewId) -> Option<&View> {
        self.views.get(id)
    }

    pub fn view_for_surface(&self, surface: SurfaceId) -> Option<&View> {
        self.views.by_surface(surface)
    }

    /// Views newest first
    pub fn views(&self) -> impl Iterator<Item = &View> {
        self.views.iter()
    }

    pub fn focused(&self) -> Option<ViewId> {
        self.focus.focused()
    }

    pub fn stats(&self) -> ServerStats {
        ServerStats {
            live_views: self.views.len(),
            ..self.stats
        }
    }

    /// The most recent destroy
    pub fn last_teardown(&self) -> Option<Teardown> {
        self.last_teardown
    }

    /// Every completed destroy, oldest first, if transitions are recorded
    pub fn teardowns(&self) -> Option<&[Teardown]> {
        self.teardowns.as_deref()
    }

    pub fn bus(&self) -> &SignalBus {
        &self.bus
    }

    pub fn surfaces(&self) -> &S {
        &self.surfaces
    }

    pub fn surfaces_mut(&mut self) -> &mut S {
        &mut self.surfaces
    }

    pub fn config(&self) -> &XwmConfig {
        &self.config
    }

    fn handle_new_surface(&mut self, surface: SurfaceId, override_redirect: bool) -> bool {
        if !self.config.xwayland.enabled {
            warn!("🚫 XWayland disabled, ignoring new {}", surface);
            return false;
        }

        let mut cx = IntakeContext {
            surfaces: &mut self.surfaces,
            bus: &mut self.bus,
            views: &mut self.views,
            unmanaged: self.unmanaged.as_mut(),
        };
        match self.router.route(&mut cx, surface, override_redirect) {
            Intake::Unmanaged => self.stats.unmanaged_handoffs += 1,
            Intake::Managed(_) => self.stats.views_created += 1,
        }
        true
    }

    /// Run `handle` for every view listening to `signal` on `source`.
    /// `false` if nobody was listening.
    fn deliver(
        &mut self,
        source: SignalSource,
        signal: Signal,
        mut handle: impl FnMut(&mut Self, ViewId),
    ) -> bool {
        let mut ids = std::mem::take(&mut self.scratch);
        ids.clear();
        ids.extend(self.bus.listeners(source, signal));
        for &id in &ids {
            handle(self, id);
        }
        let delivered = !ids.is_empty();
        self.scratch = ids;
        delivered
    }

    fn forget_unmanaged(&mut self, surface: SurfaceId) -> bool {
        let forgotten = self.unmanaged.forget(surface);
        if forgotten {
            debug!("🫥 Unmanaged {} destroyed", surface);
        }
        forgotten
    }

    fn with_view(&mut self, id: ViewId, transition: fn(&mut View, &mut ViewContext<'_>)) {
        let mapped = self.views.mapped_ids();
        let Some(view) = self.views.get_mut(id) else {
            panic!("{} has listeners but is not in the collection", id);
        };
        let mut cx = ViewContext {
            bus: &mut self.bus,
            surfaces: &mut self.surfaces,
            placement: self.placement.as_mut(),
            focus: self.focus.as_mut(),
            decorations: self.decorations,
            mapped: &mapped,
        };
        transition(view, &mut cx);
    }

    fn destroy_view(&mut self, id: ViewId) {
        let Some(view) = self.views.remove(id) else {
            panic!("{} destroyed but not in the collection", id);
        };
        let mapped = self.views.mapped_ids();
        let mut cx = ViewContext {
            bus: &mut self.bus,
            surfaces: &mut self.surfaces,
            placement: self.placement.as_mut(),
            focus: self.focus.as_mut(),
            decorations: self.decorations,
            mapped: &mapped,
        };
        let teardown = view.handle_destroy(&mut cx);
        self.last_teardown = Some(teardown);
        if let Some(teardowns) = self.teardowns.as_mut() {
            teardowns.push(teardown);
        }
        self.stats.views_destroyed += 1;
    }
}
