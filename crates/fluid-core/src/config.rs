use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::breakpoint::BreakpointOrder;
use crate::clamp::{ClampCodec, DEFAULT_MIN_SCREEN_REF, DEFAULT_SCREEN_DIFF_REF, ViewportRefs};

pub const CONFIG_FILE_NAME: &str = "fluid.toml";

/// Default breakpoint order, largest to smallest with desktop as the root.
pub const DEFAULT_BREAKPOINTS: &[&str] = &[
    "desktop",
    "widescreen",
    "laptop",
    "tablet_extra",
    "tablet",
    "mobile_extra",
    "mobile",
];

fn default_breakpoints() -> Vec<String> {
    DEFAULT_BREAKPOINTS.iter().map(|s| s.to_string()).collect()
}

/// Top-level fluid.toml configuration
///
/// Every key is optional:
/// ```toml
/// breakpoints = ["desktop", "tablet", "mobile"]
///
/// [viewport]
/// min-screen-ref = "var(--min-screen)"
/// screen-diff-ref = "var(--screen-diff)"
/// min-width = 320
/// max-width = 1440
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FluidToml {
    /// Breakpoint identifiers, largest to smallest
    #[serde(default = "default_breakpoints")]
    pub breakpoints: Vec<String>,

    /// Viewport references and reference widths
    #[serde(default)]
    pub viewport: ViewportConfig,
}

/// Viewport section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ViewportConfig {
    /// Token substituted for the minimum reference screen width
    pub min_screen_ref: String,

    /// Token substituted for the reference screen width span
    pub screen_diff_ref: String,

    /// Width in px the min-screen reference stands for (used by previews)
    pub min_width: u32,

    /// Width in px at which the max value is reached (used by previews)
    pub max_width: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_screen_ref: DEFAULT_MIN_SCREEN_REF.to_string(),
            screen_diff_ref: DEFAULT_SCREEN_DIFF_REF.to_string(),
            min_width: 320,
            max_width: 1440,
        }
    }
}

impl ViewportConfig {
    pub fn refs(&self) -> ViewportRefs {
        ViewportRefs {
            min_screen: self.min_screen_ref.clone(),
            screen_diff: self.screen_diff_ref.clone(),
        }
    }
}

impl Default for FluidToml {
    fn default() -> Self {
        Self {
            breakpoints: default_breakpoints(),
            viewport: ViewportConfig::default(),
        }
    }
}

impl FluidToml {
    /// Parse from TOML string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse fluid.toml: {e}"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Load the explicit config path if given, else `fluid.toml` in `dir`, else defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            log::debug!("Using config {}", candidate.display());
            return Self::from_file(&candidate);
        }

        log::debug!("No {CONFIG_FILE_NAME} in {}, using defaults", dir.display());
        Ok(Self::default())
    }

    pub fn breakpoint_order(&self) -> BreakpointOrder {
        BreakpointOrder::new(self.breakpoints.iter().cloned())
    }

    pub fn codec(&self) -> ClampCodec {
        ClampCodec::new(self.viewport.refs())
    }
}
