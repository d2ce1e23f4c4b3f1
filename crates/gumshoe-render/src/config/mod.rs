//! Renderer configuration.
//!
//! Loaded from TOML; every field is optional and falls back to the defaults
//! below. Example:
//!
//! ```toml
//! clear_color = "#101018"
//! image_smoothing = false
//! cull_margin = 100.0
//! log_filter = "gumshoe_render=debug"
//!
//! [[layers]]
//! name = "background"
//! z_index = 0
//! ```

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::layer::{LayerDef, default_layer_defs};
use crate::paint::Color;
use crate::render::DEFAULT_CULL_MARGIN;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Destination fill at the start of every frame (`#rgb`, `#rrggbb`, `#rrggbbaa`).
    pub clear_color: String,
    pub image_smoothing: bool,
    pub cull_margin: f32,
    pub layers: Vec<LayerDef>,
    /// `env_logger` filter; `RUST_LOG` applies when unset.
    pub log_filter: Option<String>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_color: "#000000".to_string(),
            image_smoothing: false,
            cull_margin: DEFAULT_CULL_MARGIN,
            layers: default_layer_defs(),
            log_filter: None,
        }
    }
}

impl RendererConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, RenderError> {
        let config: Self = toml::from_str(source).map_err(|e| RenderError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read renderer config {}", path.display()))?;
        let config = Self::from_toml_str(&source)
            .with_context(|| format!("failed to parse renderer config {}", path.display()))?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, RenderError> {
        toml::to_string_pretty(self).map_err(|e| RenderError::Config(e.to_string()))
    }

    pub fn parsed_clear_color(&self) -> Result<Color, RenderError> {
        Ok(Color::from_hex(&self.clear_color)?)
    }

    /// Rejects malformed colors, negative or non-finite margins and
    /// duplicate layer names.
    pub fn validate(&self) -> Result<(), RenderError> {
        self.parsed_clear_color()?;

        if !(self.cull_margin.is_finite() && self.cull_margin >= 0.0) {
            return Err(RenderError::Config(format!("cull_margin must be >= 0, got {}", self.cull_margin)));
        }

        let mut seen = HashSet::new();
        for def in &self.layers {
            if !seen.insert(def.name.as_str()) {
                return Err(RenderError::Config(format!("layer {:?} listed twice", def.name)));
            }
        }
        if self.layers.is_empty() {
            log::warn!("renderer config defines no layers; nothing will composite");
        }
        Ok(())
    }
}
