//! Client-initiated ConfigureRequest handling
//!
//! X11 clients position themselves. Whatever geometry they ask for is sent
//! straight back through the view's configure operation; the only change
//! is the truncation to the 16-bit wire format.

use log::debug;

use crate::geometry::{Geometry, WireGeometry};
use crate::surface::SurfaceLayer;
use crate::view::View;

/// Geometry a client asked for, before wire truncation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigureRequest {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl ConfigureRequest {
    pub fn geometry(&self) -> Geometry {
        Geometry::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigureAckHandler;

impl ConfigureAckHandler {
    /// Echo `request` back verbatim. Returns what went on the wire.
    pub fn acknowledge(
        &self,
        view: &View,
        surfaces: &mut dyn SurfaceLayer,
        request: ConfigureRequest,
    ) -> WireGeometry {
        debug!(
            "📨 {} requested {}x{} at ({}, {})",
            view.id(),
            request.width,
            request.height,
            request.x,
            request.y
        );
        let geometry = request.geometry();
        view.ops().configure(view, surfaces, geometry);
        geometry.to_wire()
    }
}
