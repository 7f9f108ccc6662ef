//! Editor configuration.
//!
//! Everything has a default, so a config file only needs the keys it wants
//! to override. Files ending in `.toml` are read as TOML, anything else as
//! JSON (falling back to the other format when the first one fails).

use anyhow::{Context, Result, anyhow};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

/// Defaults applied to floors created without explicit bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorDefaults {
    pub height: f64,
    pub width: f64,
    pub depth: f64,
    pub max_load: f64,
}

impl Default for FloorDefaults {
    fn default() -> Self {
        Self {
            height: 280.0,
            width: 800.0,
            depth: 1000.0,
            max_load: 3000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of history snapshots kept.
    pub history_limit: usize,
    /// Pixels per unit of element dimension inside a container.
    pub canvas_scale: f64,
    pub zoom_min: f64,
    pub zoom_max: f64,
    /// Where buffer entries are pasted when no position is given.
    pub default_paste_position: (f64, f64),
    /// Written to `meta.app` on export.
    pub app_name: String,
    /// Canvas size when viewing a floor.
    pub default_canvas: CanvasSize,
    /// Lower bound of the canvas size inside a container.
    pub min_canvas: CanvasSize,
    pub floor_defaults: FloorDefaults,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: 50,
            canvas_scale: 10.0,
            zoom_min: 0.1,
            zoom_max: 5.0,
            default_paste_position: (100.0, 100.0),
            app_name: "floorstack".to_string(),
            default_canvas: CanvasSize {
                width: 800.0,
                height: 600.0,
            },
            min_canvas: CanvasSize {
                width: 400.0,
                height: 300.0,
            },
            floor_defaults: FloorDefaults::default(),
        }
    }
}

impl EditorConfig {
    /// Load a config file, picking the format from the extension.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_std_path())
            .with_context(|| format!("Failed to read config {}", path))?;
        Self::parse(&text, path.extension() == Some("toml"))
            .with_context(|| format!("Invalid config {}", path))
    }

    fn parse(text: &str, toml_first: bool) -> Result<Self> {
        let from_toml = || toml::from_str::<EditorConfig>(text).ok();
        let from_json = || serde_json::from_str::<EditorConfig>(text).ok();
        let parsed = if toml_first {
            from_toml().or_else(from_json)
        } else {
            from_json().or_else(from_toml)
        };
        parsed.ok_or_else(|| anyhow!("neither TOML nor JSON"))
    }

    /// Write the config, picking the format from the extension.
    pub fn save(&self, path: &Utf8Path) -> Result<()> {
        let text = if path.extension() == Some("toml") {
            toml::to_string_pretty(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };
        std::fs::write(path.as_std_path(), text)
            .with_context(|| format!("Failed to write config {}", path))
    }

    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.max(self.zoom_min).min(self.zoom_max)
    }
}
