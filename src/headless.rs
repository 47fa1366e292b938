//! Headless XWayland surface layer
//!
//! Keeps X11 surface state in memory and records every outbound request,
//! so the view core can run without an X server. Configure requests are
//! applied to the stored state the way Xwayland would apply them.

use std::collections::HashMap;

use log::debug;

use crate::decoration::DecorationMode;
use crate::geometry::WireGeometry;
use crate::surface::{SurfaceId, SurfaceLayer, WlSurfaceId, XSurfaceState};

/// A request the view core sent to the surface layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboundCall {
    Ping(SurfaceId),
    Configure(SurfaceId, WireGeometry),
    Close(SurfaceId),
}

#[derive(Debug, Default)]
pub struct HeadlessSurfaceLayer {
    surfaces: HashMap<SurfaceId, XSurfaceState>,
    committed: HashMap<WlSurfaceId, (u32, u32)>,
    calls: Vec<OutboundCall>,
    next_wl_surface: u32,
}

impl HeadlessSurfaceLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new, unmapped X11 window
    pub fn create_surface(
        &mut self,
        surface: SurfaceId,
        geometry: WireGeometry,
        override_redirect: bool,
        decorations: DecorationMode,
    ) {
        self.surfaces.insert(
            surface,
            XSurfaceState {
                x: geometry.x,
                y: geometry.y,
                width: geometry.width,
                height: geometry.height,
                override_redirect,
                decorations,
                wl_surface: None,
            },
        );
    }

    /// Back the surface by a fresh wl_surface, as Xwayland does on map
    pub fn map_surface(&mut self, surface: SurfaceId) -> Option<WlSurfaceId> {
        let state = self.surfaces.get_mut(&surface)?;
        self.next_wl_surface += 1;
        let wl_surface = WlSurfaceId(self.next_wl_surface);
        state.wl_surface = Some(wl_surface);
        self.committed.insert(wl_surface, (0, 0));
        debug!("🧪 {} now backed by {}", surface, wl_surface);
        Some(wl_surface)
    }

    /// Drop the backing wl_surface
    pub fn unmap_surface(&mut self, surface: SurfaceId) -> Option<WlSurfaceId> {
        let wl_surface = self.surfaces.get_mut(&surface)?.wl_surface.take()?;
        self.committed.remove(&wl_surface);
        Some(wl_surface)
    }

    pub fn remove_surface(&mut self, surface: SurfaceId) -> Option<XSurfaceState> {
        let state = self.surfaces.remove(&surface)?;
        if let Some(wl_surface) = state.wl_surface {
            self.committed.remove(&wl_surface);
        }
        Some(state)
    }

    /// Commit a new buffer size. `false` if the wl_surface does not exist.
    pub fn commit(&mut self, wl_surface: WlSurfaceId, width: u32, height: u32) -> bool {
        match self.committed.get_mut(&wl_surface) {
            Some(size) => {
                *size = (width, height);
                true
            }
            None => false,
        }
    }

    pub fn set_decorations(&mut self, surface: SurfaceId, decorations: DecorationMode) {
        if let Some(state) = self.surfaces.get_mut(&surface) {
            state.decorations = decorations;
        }
    }

    pub fn contains(&self, surface: SurfaceId) -> bool {
        self.surfaces.contains_key(&surface)
    }

    /// Requests sent so far, oldest first
    pub fn calls(&self) -> &[OutboundCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<OutboundCall> {
        std::mem::take(&mut self.calls)
    }

    /// Geometry of every configure sent to `surface`
    pub fn configures_for(&self, surface: SurfaceId) -> Vec<WireGeometry> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                OutboundCall::Configure(target, geometry) if *target == surface => Some(*geometry),
                _ => None,
            })
            .collect()
    }
}

impl SurfaceLayer for HeadlessSurfaceLayer {
    fn ping(&mut self, surface: SurfaceId) {
        self.calls.push(OutboundCall::Ping(surface));
    }

    fn configure(&mut self, surface: SurfaceId, geometry: WireGeometry) {
        self.calls.push(OutboundCall::Configure(surface, geometry));
        if let Some(state) = self.surfaces.get_mut(&surface) {
            state.x = geometry.x;
            state.y = geometry.y;
            state.width = geometry.width;
            state.height = geometry.height;
        }
    }

    fn close(&mut self, surface: SurfaceId) {
        self.calls.push(OutboundCall::Close(surface));
    }

    fn state(&self, surface: SurfaceId) -> Option<XSurfaceState> {
        self.surfaces.get(&surface).copied()
    }

    fn committed_size(&self, surface: WlSurfaceId) -> Option<(u32, u32)> {
        self.committed.get(&surface).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_allocates_new_wl_surface_each_time() {
        let mut layer = HeadlessSurfaceLayer::new();
        let surface = SurfaceId(1);
        layer.create_surface(surface, WireGeometry::default(), false, DecorationMode::All);

        let first = layer.map_surface(surface).unwrap();
        assert_eq!(layer.unmap_surface(surface), Some(first));
        let second = layer.map_surface(surface).unwrap();

        assert_ne!(first, second);
        assert_eq!(layer.committed_size(first), None);
        assert_eq!(layer.committed_size(second), Some((0, 0)));
    }

    #[test]
    fn test_configure_is_recorded_and_applied() {
        let mut layer = HeadlessSurfaceLayer::new();
        let surface = SurfaceId(2);
        layer.create_surface(surface, WireGeometry::default(), false, DecorationMode::All);

        let geometry = WireGeometry::truncate(10, 20, 300, 200);
        layer.configure(surface, geometry);

        assert_eq!(layer.configures_for(surface), vec![geometry]);
        let state = layer.state(surface).unwrap();
        assert_eq!((state.x, state.y, state.width, state.height), (10, 20, 300, 200));
    }

    #[test]
    fn test_commit_to_unknown_surface() {
        let mut layer = HeadlessSurfaceLayer::new();
        assert!(!layer.commit(WlSurfaceId(5), 1, 1));
    }
}
