//! New-surface intake: classify XWayland surfaces as managed or unmanaged

use log::{debug, info};

use crate::config::XwmConfig;
use crate::policy::UnmanagedTracker;
use crate::signals::SignalBus;
use crate::subscription::SubscriptionSet;
use crate::surface::{SurfaceId, SurfaceLayer};
use crate::view::{View, ViewCollection, ViewId, ViewKind};

/// Where a new surface ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intake {
    /// Override-redirect, handed to the unmanaged tracker
    Unmanaged,
    Managed(ViewId),
}

pub struct IntakeContext<'a> {
    pub surfaces: &'a mut dyn SurfaceLayer,
    pub bus: &'a mut SignalBus,
    pub views: &'a mut ViewCollection,
    pub unmanaged: &'a mut dyn UnmanagedTracker,
}

#[derive(Debug, Clone, Copy)]
pub struct SurfaceIntakeRouter {
    record_transitions: bool,
}

impl SurfaceIntakeRouter {
    pub fn new(config: &XwmConfig) -> Self {
        Self {
            record_transitions: config.debug.record_transitions,
        }
    }

    /// Handle a new XWayland surface. Geometry and decorations are left
    /// for the first map. A surface is announced exactly once.
    pub fn route(
        &self,
        cx: &mut IntakeContext<'_>,
        surface: SurfaceId,
        override_redirect: bool,
    ) -> Intake {
        assert!(
            cx.views.by_surface(surface).is_none(),
            "{} announced twice",
            surface
        );
        cx.surfaces.ping(surface);

        if override_redirect {
            debug!("🫥 {} is override-redirect, not managing it", surface);
            cx.unmanaged.adopt(surface);
            return Intake::Unmanaged;
        }

        let id = cx.views.allocate_id();
        let subscriptions = SubscriptionSet::attach(cx.bus, surface, id);
        let view = View::new(
            id,
            ViewKind::Xwayland,
            surface,
            subscriptions,
            self.record_transitions,
        );
        cx.views.insert(view);

        info!("🪟 New X11 view {} for {}", id, surface);
        Intake::Managed(id)
    }
}
