//! Server-side decoration preference for X11 windows
//!
//! X11 clients announce their decoration wishes through motif hints, which
//! XWayland collapses into a small enumeration. The compositor only has to
//! decide whether it should draw a titlebar and borders itself; rendering
//! them is somebody else's job.

use log::debug;

use crate::config::DecorationsConfig;

/// Decoration hint reported by an XWayland surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DecorationMode {
    /// Client wants the full set of window decorations
    #[default]
    All,
    /// Client draws no border
    NoBorder,
    /// Client draws no title
    NoTitle,
    /// Any flag combination the enumeration has no name for
    Other(u32),
}

impl DecorationMode {
    pub const RAW_ALL: u32 = 0;
    pub const RAW_NO_BORDER: u32 = 1;
    pub const RAW_NO_TITLE: u32 = 2;

    pub fn from_raw(raw: u32) -> Self {
        match raw {
            Self::RAW_ALL => DecorationMode::All,
            Self::RAW_NO_BORDER => DecorationMode::NoBorder,
            Self::RAW_NO_TITLE => DecorationMode::NoTitle,
            other => DecorationMode::Other(other),
        }
    }

    pub fn to_raw(self) -> u32 {
        match self {
            DecorationMode::All => Self::RAW_ALL,
            DecorationMode::NoBorder => Self::RAW_NO_BORDER,
            DecorationMode::NoTitle => Self::RAW_NO_TITLE,
            DecorationMode::Other(raw) => raw,
        }
    }
}

/// Decides whether the compositor draws decorations for a view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecorationPolicy {
    force_client_side: bool,
}

impl DecorationPolicy {
    pub fn new(config: &DecorationsConfig) -> Self {
        Self {
            force_client_side: config.force_client_side,
        }
    }

    /// Only the raw "all decorations" hint asks for server-side decorations
    pub fn wants_server_side(&self, mode: DecorationMode) -> bool {
        if self.force_client_side {
            debug!("🎨 Client-side decorations forced by configuration");
            return false;
        }
        mode.to_raw() == DecorationMode::RAW_ALL
    }
}
