//! Configuration management for the XWayland view core
//!
//! Settings are loaded from a TOML file. Every section is optional and
//! falls back to its defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration struct
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct XwmConfig {
    /// XWayland surface intake
    #[serde(default)]
    pub xwayland: XWaylandConfig,

    /// Decoration preference
    #[serde(default)]
    pub decorations: DecorationsConfig,

    /// Initial placement of new views
    #[serde(default)]
    pub placement: PlacementConfig,

    /// Debugging aids
    #[serde(default)]
    pub debug: DebugConfig,
}

/// XWayland configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct XWaylandConfig {
    /// Enable XWayland support
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct DecorationsConfig {
    /// Never draw server-side decorations, whatever the client hints
    pub force_client_side: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlacementConfig {
    /// "client" keeps the client's position, "center" centers on the output
    pub mode: String,

    /// Output size used by "center"
    pub output_width: u32,
    pub output_height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct DebugConfig {
    /// Keep a per-view log of map/unmap transitions, plus the focus and
    /// teardown logs of the server
    pub record_transitions: bool,
}

impl Default for XWaylandConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            mode: "client".to_string(),
            output_width: 1920,
            output_height: 1080,
        }
    }
}

impl XwmConfig {
    const PLACEMENT_MODES: [&'static str; 2] = ["client", "center"];

    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let expanded_path = expand_home(path.as_ref())?;

        let contents = fs::read_to_string(&expanded_path)
            .with_context(|| format!("Failed to read config file: {}", expanded_path.display()))?;

        let config = Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", expanded_path.display()))?;

        Ok(config)
    }

    /// Parse and validate a TOML document
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: XwmConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !Self::PLACEMENT_MODES.contains(&self.placement.mode.as_str()) {
            anyhow::bail!("Invalid placement mode: {}", self.placement.mode);
        }

        if self.placement.output_width == 0 || self.placement.output_height == 0 {
            anyhow::bail!("Invalid output size: width and height must be non-zero");
        }

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, contents).context("Failed to write configuration file")?;

        Ok(())
    }
}

/// Expand a leading `~` to the home directory
fn expand_home(path: &Path) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => {
            let home = std::env::var("HOME").context("Failed to get HOME environment variable")?;
            Ok(Path::new(&home).join(rest))
        }
        Err(_) => Ok(path.to_path_buf()),
    }
}
