//! Surface layer interface
//!
//! The XWayland surface layer owns the actual X11 windows and their
//! Wayland surfaces. The view core only reads state from it and issues the
//! three outbound requests it needs: ping, configure and close.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::decoration::DecorationMode;
use crate::geometry::WireGeometry;

/// Handle of an XWayland surface (one X11 window)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceId(pub u32);

/// Handle of the Wayland surface backing an XWayland surface while mapped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WlSurfaceId(pub u32);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "xsurface#{}", self.0)
    }
}

impl fmt::Display for WlSurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wl_surface#{}", self.0)
    }
}

/// Snapshot of the X11-side state of a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XSurfaceState {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
    pub override_redirect: bool,
    pub decorations: DecorationMode,
    /// Backing Wayland surface; only present once the X11 window is mapped
    pub wl_surface: Option<WlSurfaceId>,
}

/// Calls into the XWayland surface layer
pub trait SurfaceLayer {
    /// Fire-and-forget liveness probe
    fn ping(&mut self, surface: SurfaceId);

    /// Send a ConfigureWindow with already-truncated wire geometry
    fn configure(&mut self, surface: SurfaceId, geometry: WireGeometry);

    /// Ask the client to close the window
    fn close(&mut self, surface: SurfaceId);

    /// Current X11-side state, `None` once the surface is gone
    fn state(&self, surface: SurfaceId) -> Option<XSurfaceState>;

    /// Size currently committed on a Wayland surface
    fn committed_size(&self, surface: WlSurfaceId) -> Option<(u32, u32)>;
}
