// src/config/config_types.rs
//
// Sections of config.toml

use serde::Deserialize;

use crate::models::{Color, ColorError};

#[derive(Debug, Clone, Deserialize)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    /// Hex color, e.g. "#fffceb"
    pub background: String,
}

impl CanvasConfig {
    pub fn background_color(&self) -> Result<Color, ColorError> {
        Color::hex(&self.background)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PainterConfig {
    /// Fixed seed for reproducible paintings; entropy when absent.
    pub seed: Option<u64>,
    pub brush: String,
    pub color: String,
    pub weight: f32,
    /// Field selected at startup, none when absent.
    pub field: Option<String>,
    #[serde(default = "default_color_cache")]
    pub color_cache: bool,
}

fn default_color_cache() -> bool {
    true
}

impl PainterConfig {
    pub fn stroke_color(&self) -> Result<Color, ColorError> {
        Color::hex(&self.color)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathConfig {
    /// JSON brush catalog loaded on top of the standard brushes.
    pub brushes: Option<String>,
    /// Directory image tip paths are relative to.
    pub tip_images: String,
    pub output_directory: String,
}
