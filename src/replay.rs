//! Scripted event replay against the headless surface layer
//!
//! A script is a TOML list of surface-layer events:
//!
//! ```toml
//! [[event]]
//! type = "new_surface"
//! surface = 1
//! x = 100
//! y = 50
//! width = 640
//! height = 480
//!
//! [[event]]
//! type = "map"
//! surface = 1
//!
//! [[event]]
//! type = "commit"
//! surface = 1
//! width = 640
//! height = 480
//! ```
//!
//! The replayer keeps the headless layer's state in step with each event
//! before dispatching it, and refuses sequences Xwayland itself would never
//! produce (a second map without an unmap, events after destroy).

use std::collections::HashSet;

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decoration::DecorationMode;
use crate::geometry::WireGeometry;
use crate::headless::HeadlessSurfaceLayer;
use crate::server::{Server, SurfaceEvent};
use crate::surface::{SurfaceId, SurfaceLayer};
use crate::xwayland::ConfigureRequest;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    NewSurface {
        surface: u32,
        #[serde(default)]
        override_redirect: bool,
        #[serde(default)]
        x: i16,
        #[serde(default)]
        y: i16,
        #[serde(default)]
        width: u16,
        #[serde(default)]
        height: u16,
        /// Raw decoration hint, 0 = all decorations
        #[serde(default)]
        decorations: u32,
    },
    Map {
        surface: u32,
    },
    Unmap {
        surface: u32,
    },
    Commit {
        surface: u32,
        width: u32,
        height: u32,
    },
    RequestConfigure {
        surface: u32,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    /// Compositor-initiated close of the view on `surface`
    Close {
        surface: u32,
    },
    Destroy {
        surface: u32,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    #[serde(rename = "event", default)]
    pub events: Vec<ScriptEvent>,
}

impl Script {
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse event script")
    }
}

/// Event sequences the surface layer would never emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("event {index}: unknown surface {surface}")]
    UnknownSurface { index: usize, surface: SurfaceId },

    #[error("event {index}: surface {surface} created twice")]
    DuplicateSurface { index: usize, surface: SurfaceId },

    #[error("event {index}: surface {surface} used after destroy")]
    Destroyed { index: usize, surface: SurfaceId },

    #[error("event {index}: surface {surface} is already mapped")]
    AlreadyMapped { index: usize, surface: SurfaceId },

    #[error("event {index}: surface {surface} is not mapped")]
    NotMapped { index: usize, surface: SurfaceId },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
}

/// Feed `script` through `server`
pub fn replay(
    server: &mut Server<HeadlessSurfaceLayer>,
    script: &Script,
) -> std::result::Result<ReplaySummary, ReplayError> {
    let mut replayer = Replayer::default();
    for (index, event) in script.events.iter().enumerate() {
        replayer.step(server, index, event)?;
    }
    info!("▶️ Replayed {} events", script.events.len());
    Ok(ReplaySummary {
        events: script.events.len(),
    })
}

#[derive(Debug, Default)]
struct Replayer {
    destroyed: HashSet<SurfaceId>,
}

impl Replayer {
    fn step(
        &mut self,
        server: &mut Server<HeadlessSurfaceLayer>,
        index: usize,
        event: &ScriptEvent,
    ) -> std::result::Result<(), ReplayError> {
        debug!("▶️ #{} {:?}", index, event);
        match *event {
            ScriptEvent::NewSurface {
                surface,
                override_redirect,
                x,
                y,
                width,
                height,
                decorations,
            } => {
                let surface = SurfaceId(surface);
                if server.surfaces().contains(surface) || self.destroyed.contains(&surface) {
                    return Err(ReplayError::DuplicateSurface { index, surface });
                }
                server.surfaces_mut().create_surface(
                    surface,
                    WireGeometry {
                        x,
                        y,
                        width,
                        height,
                    },
                    override_redirect,
                    DecorationMode::from_raw(decorations),
                );
                server.dispatch(SurfaceEvent::NewSurface {
                    surface,
                    override_redirect,
                });
            }
            ScriptEvent::Map { surface } => {
                let surface = self.live(server, index, surface)?;
                if server.surfaces().state(surface).and_then(|s| s.wl_surface).is_some() {
                    return Err(ReplayError::AlreadyMapped { index, surface });
                }
                server.surfaces_mut().map_surface(surface);
                server.dispatch(SurfaceEvent::Map { surface });
            }
            ScriptEvent::Unmap { surface } => {
                let surface = self.live(server, index, surface)?;
                if server.surfaces().state(surface).and_then(|s| s.wl_surface).is_none() {
                    return Err(ReplayError::NotMapped { index, surface });
                }
                // Listeners run before the surface layer tears the wl_surface down.
                server.dispatch(SurfaceEvent::Unmap { surface });
                server.surfaces_mut().unmap_surface(surface);
            }
            ScriptEvent::Commit {
                surface,
                width,
                height,
            } => {
                let surface = self.live(server, index, surface)?;
                let Some(wl_surface) = server.surfaces().state(surface).and_then(|s| s.wl_surface)
                else {
                    return Err(ReplayError::NotMapped { index, surface });
                };
                server.surfaces_mut().commit(wl_surface, width, height);
                server.dispatch(SurfaceEvent::Commit {
                    surface: wl_surface,
                });
            }
            ScriptEvent::RequestConfigure {
                surface,
                x,
                y,
                width,
                height,
            } => {
                let surface = self.live(server, index, surface)?;
                server.dispatch(SurfaceEvent::RequestConfigure {
                    surface,
                    request: ConfigureRequest {
                        x,
                        y,
                        width,
                        height,
                    },
                });
            }
            ScriptEvent::Close { surface } => {
                let surface = self.live(server, index, surface)?;
                if let Some(id) = server.view_for_surface(surface).map(|view| view.id()) {
                    server.close_view(id);
                }
            }
            ScriptEvent::Destroy { surface } => {
                let surface = self.live(server, index, surface)?;
                server.dispatch(SurfaceEvent::Destroy { surface });
                server.surfaces_mut().remove_surface(surface);
                self.destroyed.insert(surface);
            }
        }
        Ok(())
    }

    fn live(
        &self,
        server: &Server<HeadlessSurfaceLayer>,
        index: usize,
        surface: u32,
    ) -> std::result::Result<SurfaceId, ReplayError> {
        let surface = SurfaceId(surface);
        if self.destroyed.contains(&surface) {
            return Err(ReplayError::Destroyed { index, surface });
        }
        if !server.surfaces().contains(surface) {
            return Err(ReplayError::UnknownSurface { index, surface });
        }
        Ok(surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::XwmConfig;

    fn server() -> Server<HeadlessSurfaceLayer> {
        Server::new(XwmConfig::default(), HeadlessSurfaceLayer::new())
    }

    #[test]
    fn test_parse_script() -> Result<()> {
        let script = Script::from_toml(
            r#"
[[event]]
type = "new_surface"
surface = 1
width = 640
height = 480

[[event]]
type = "request_configure"
surface = 1
x = 40000
y = 0
width = 10
height = 10
"#,
        )?;

        assert_eq!(script.events.len(), 2);
        assert_eq!(
            script.events[1],
            ScriptEvent::RequestConfigure {
                surface: 1,
                x: 40000,
                y: 0,
                width: 10,
                height: 10
            }
        );
        Ok(())
    }

    #[test]
    fn test_unknown_event_type_rejected() {
        let result = Script::from_toml("[[event]]\ntype = \"resize\"\nsurface = 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_replay_full_cycle() {
        let mut server = server();
        let script = Script {
            events: vec![
                ScriptEvent::NewSurface {
                    surface: 1,
                    override_redirect: false,
                    x: 5,
                    y: 6,
                    width: 100,
                    height: 100,
                    decorations: 0,
                },
                ScriptEvent::Map { surface: 1 },
                ScriptEvent::Commit {
                    surface: 1,
                    width: 640,
                    height: 480,
                },
                ScriptEvent::Unmap { surface: 1 },
                ScriptEvent::Destroy { surface: 1 },
            ],
        };

        let summary = replay(&mut server, &script).unwrap();
        assert_eq!(summary.events, 5);
        assert_eq!(server.stats().views_created, 1);
        assert_eq!(server.stats().views_destroyed, 1);
        assert_eq!(server.stats().commits, 1);
        assert!(server.bus().is_empty());
    }

    #[test]
    fn test_double_map_refused() {
        let mut server = server();
        let script = Script {
            events: vec![
                ScriptEvent::NewSurface {
                    surface: 1,
                    override_redirect: false,
                    x: 0,
                    y: 0,
                    width: 1,
                    height: 1,
                    decorations: 0,
                },
                ScriptEvent::Map { surface: 1 },
                ScriptEvent::Map { surface: 1 },
            ],
        };

        let err = replay(&mut server, &script).unwrap_err();
        assert_eq!(
            err,
            ReplayError::AlreadyMapped {
                index: 2,
                surface: SurfaceId(1)
            }
        );
    }

    #[test]
    fn test_events_after_destroy_refused() {
        let mut server = server();
        let script = Script {
            events: vec![
                ScriptEvent::NewSurface {
                    surface: 3,
                    override_redirect: false,
                    x: 0,
                    y: 0,
                    width: 1,
                    height: 1,
                    decorations: 0,
                },
                ScriptEvent::Destroy { surface: 3 },
                ScriptEvent::Map { surface: 3 },
            ],
        };

        let err = replay(&mut server, &script).unwrap_err();
        assert!(matches!(err, ReplayError::Destroyed { index: 2, .. }));
        assert_eq!(
            err.to_string(),
            "event 2: surface xsurface#3 used after destroy"
        );
    }

    #[test]
    fn test_commit_while_unmapped_refused() {
        let mut server = server();
        let script = Script {
            events: vec![
                ScriptEvent::NewSurface {
                    surface: 1,
                    override_redirect: false,
                    x: 0,
                    y: 0,
                    width: 1,
                    height: 1,
                    decorations: 0,
                },
                ScriptEvent::Commit {
                    surface: 1,
                    width: 2,
                    height: 2,
                },
            ],
        };

        assert!(matches!(
            replay(&mut server, &script),
            Err(ReplayError::NotMapped { index: 1, .. })
        ));
    }
}
