//! Editor configuration file handling.
//!
//! The configuration is a small JSON file; every field has a default so a
//! partial file (or no file at all) is fine.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::document::{DEFAULT_DOCUMENT_NAME, ZOOM_MAX, ZOOM_MIN};
use crate::engine::grid::{DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, GridBounds};

/// Largest grid edge the editor accepts
pub const MAX_GRID_EDGE: i32 = 500;

/// Editor settings that can be saved/loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    // Grid
    pub grid_width: i32,
    pub grid_height: i32,

    // History
    pub max_history: usize,

    // Zoom
    pub zoom_min: f64,
    pub zoom_max: f64,
    pub zoom_step: f64,

    // Documents
    pub default_document_name: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_width: DEFAULT_GRID_WIDTH,
            grid_height: DEFAULT_GRID_HEIGHT,
            max_history: 50,
            zoom_min: ZOOM_MIN,
            zoom_max: ZOOM_MAX,
            zoom_step: 0.25,
            default_document_name: DEFAULT_DOCUMENT_NAME.to_string(),
        }
    }
}

impl EditorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grid extent described by this config
    pub fn bounds(&self) -> GridBounds {
        GridBounds::new(self.grid_width, self.grid_height)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        info!("Saved editor configuration to {:?}", path.as_ref());
        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        info!("Loaded editor configuration from {:?}", path.as_ref());
        Ok(config)
    }

    /// Load from `path` if given, otherwise use defaults; always validated
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_GRID_EDGE).contains(&self.grid_width) {
            anyhow::bail!("Grid width must be between 1 and {}", MAX_GRID_EDGE);
        }
        if !(1..=MAX_GRID_EDGE).contains(&self.grid_height) {
            anyhow::bail!("Grid height must be between 1 and {}", MAX_GRID_EDGE);
        }

        if self.max_history == 0 {
            anyhow::bail!("History limit must be at least 1");
        }

        // Zoom range must include 1.0 so the default zoom is always reachable
        if !(self.zoom_min > 0.0 && self.zoom_min <= 1.0) {
            anyhow::bail!("Minimum zoom must be in (0, 1]");
        }
        if self.zoom_max < 1.0 {
            anyhow::bail!("Maximum zoom must be at least 1");
        }
        if !(self.zoom_step > 0.0) {
            anyhow::bail!("Zoom step must be positive");
        }

        if self.default_document_name.trim().is_empty() {
            anyhow::bail!("Default document name must not be empty");
        }

        Ok(())
    }
}
