//! View geometry and the 16-bit X11 wire format
//!
//! X11 carries window positions as signed 16-bit and sizes as unsigned
//! 16-bit values. The compositor keeps wider integers internally and only
//! narrows them at the wire boundary, wrapping silently the way the
//! protocol itself does.

use serde::{Deserialize, Serialize};

/// Position and size of a view in compositor space
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Geometry {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Narrow to the wire format
    pub fn to_wire(self) -> WireGeometry {
        WireGeometry::truncate(self.x, self.y, self.width, self.height)
    }
}

/// Geometry exactly as it travels in a ConfigureWindow request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WireGeometry {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
}

impl WireGeometry {
    /// Two's-complement truncation to the low 16 bits of every field.
    ///
    /// `x = 40000` becomes `-25536`, `width = 70000` becomes `4464`.
    pub fn truncate(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x: x as i16,
            y: y as i16,
            width: width as u16,
            height: height as u16,
        }
    }

    pub fn widen(self) -> Geometry {
        Geometry {
            x: i32::from(self.x),
            y: i32::from(self.y),
            width: u32::from(self.width),
            height: u32::from(self.height),
        }
    }
}

impl From<WireGeometry> for Geometry {
    fn from(wire: WireGeometry) -> Self {
        wire.widen()
    }
}

/// Last-known size of a view, refreshed from the underlying surface on commit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeometryCache {
    width: u32,
    height: u32,
    refreshes: u64,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the currently committed dimensions
    pub fn refresh(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.refreshes += 1;
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of commits that reached this cache
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }
}
