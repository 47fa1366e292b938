//! # Axiom XWayland view core
//!
//! Lifecycle management for managed X11 windows inside the Axiom
//! compositor. An XWayland surface becomes a [`View`] when it is created,
//! is mapped and unmapped any number of times, and is torn down when the
//! surface is destroyed.
//!
//! ## Architecture
//!
//! - `server`: the dispatcher and owner of the global view collection
//! - `xwayland`: surface intake, X11 view operations, configure echo
//! - `view`: the view model and its lifecycle state machine
//! - `signals` / `subscription`: listener tokens and per-view bookkeeping
//! - `geometry`: position/size cache and the 16-bit wire format
//! - `decoration`: server-side decoration preference
//! - `policy`: placement, focus and unmanaged-surface seams
//! - `headless` / `replay`: in-memory surface layer and event scripts
//! - `config`: TOML configuration
//!
//! ## Usage
//!
//! ```rust
//! use axiom_xwayland::{HeadlessSurfaceLayer, Server, SurfaceEvent, XwmConfig};
//! use axiom_xwayland::surface::SurfaceId;
//!
//! let mut server = Server::new(XwmConfig::default(), HeadlessSurfaceLayer::new());
//! server.dispatch(SurfaceEvent::NewSurface {
//!     surface: SurfaceId(1),
//!     override_redirect: true,
//! });
//! assert_eq!(server.views().count(), 0);
//! ```

pub mod config;
pub mod decoration;
pub mod geometry;
pub mod headless;
pub mod policy;
pub mod replay;
pub mod server;
pub mod signals;
pub mod subscription;
pub mod surface;
pub mod view;
pub mod xwayland;

pub use config::XwmConfig;
pub use headless::HeadlessSurfaceLayer;
pub use server::{Server, ServerStats, SurfaceEvent};
pub use view::{MappedState, View, ViewId};

pub use anyhow::{Context, Error, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
