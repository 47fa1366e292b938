//! XWayland integration for X11 app compatibility
//!
//! Managed X11 windows become [`View`]s with the operations below.
//! Override-redirect windows (menus, tooltips, drag icons) are handed to
//! the unmanaged tracker by the intake router and never reach this code.

use log::debug;

use crate::geometry::Geometry;
use crate::surface::SurfaceLayer;
use crate::view::lifecycle::MapParams;
use crate::view::{View, ViewContext, ViewOps};

pub mod configure;
pub mod intake;

pub use configure::{ConfigureAckHandler, ConfigureRequest};
pub use intake::{Intake, IntakeContext, SurfaceIntakeRouter};

/// Operations of views backed by an XWayland surface
#[derive(Debug, Default, Clone, Copy)]
pub struct XwaylandOps;

impl ViewOps for XwaylandOps {
    fn configure(&self, view: &View, surfaces: &mut dyn SurfaceLayer, geometry: Geometry) {
        let wire = geometry.to_wire();
        debug!(
            "📐 Configure {} -> {}x{} at ({}, {})",
            view.id(),
            wire.width,
            wire.height,
            wire.x,
            wire.y
        );
        surfaces.configure(view.surface(), wire);
    }

    fn close(&self, view: &View, surfaces: &mut dyn SurfaceLayer) {
        debug!("❎ Closing {}", view.id());
        surfaces.close(view.surface());
    }

    fn on_map(&self, view: &mut View, cx: &mut ViewContext<'_>) {
        let Some(state) = cx.surfaces.state(view.surface()) else {
            panic!("{} mapped after its surface went away", view.id());
        };
        // The backing wl_surface can change between map cycles.
        let Some(wl_surface) = state.wl_surface else {
            panic!("{} mapped without a backing wl_surface", view.id());
        };

        let params = MapParams {
            position: (i32::from(state.x), i32::from(state.y)),
            wl_surface,
            decorations: state.decorations,
            requested: Geometry::new(
                i32::from(state.x),
                i32::from(state.y),
                u32::from(state.width),
                u32::from(state.height),
            ),
        };
        view.enter_mapped(cx, params);
    }

    fn on_unmap(&self, view: &mut View, cx: &mut ViewContext<'_>) {
        view.leave_mapped(cx);
    }
}
