// src/config/config_load.rs
//
// loading config.toml

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::config_types::{CanvasConfig, PainterConfig, PathConfig};
use crate::logging::LoggingConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub canvas: CanvasConfig,
    pub painter: PainterConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub paths: PathConfig,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        // First try to load from the executable's directory
        if let Some(exe_config) = Self::load_from_exe_dir() {
            return Ok(exe_config);
        }

        // Fallback to loading from the current working directory
        Self::load_from_path("config.toml")
    }

    fn load_from_exe_dir() -> Option<Self> {
        let config_path = exe_dir()?.join("config.toml");
        if !config_path.exists() {
            return None;
        }
        match Self::load_from_path(&config_path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("{}, trying the working directory", e);
                None
            }
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn resolve_brushes_path(&self) -> Option<PathBuf> {
        self.paths.brushes.as_deref().map(resolve)
    }

    pub fn resolve_tip_dir(&self) -> PathBuf {
        resolve(&self.paths.tip_images)
    }

    pub fn resolve_output_dir(&self) -> PathBuf {
        resolve(&self.paths.output_directory)
    }
}

fn exe_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
}

/// Relative paths are taken from the executable's directory.
fn resolve(path: &str) -> PathBuf {
    if Path::new(path).is_absolute() {
        return PathBuf::from(path);
    }
    match exe_dir() {
        Some(dir) => dir.join(path),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogStyle;
    use crate::models::Color;

    const SAMPLE: &str = r##"
[canvas]
width = 800
height = 600
background = "#fffceb"

[painter]
seed = 42
brush = "2B"
color = "#002185"
weight = 1.5
field = "seabed"

[logging]
filter = "brushwork=debug"
style = "never"

[paths]
brushes = "brushes.json"
tip_images = "/opt/tips"
output_directory = "frames"
"##;

    #[test]
    fn test_parse_sample() {
        let config = Config::parse(SAMPLE).unwrap();
        assert_eq!((config.canvas.width, config.canvas.height), (800, 600));
        assert_eq!(config.canvas.background_color().unwrap(), Color::from_rgb8(0xff, 0xfc, 0xeb));
        assert_eq!(config.painter.seed, Some(42));
        assert_eq!(config.painter.field.as_deref(), Some("seabed"));
        assert!(config.painter.color_cache);
        assert_eq!(config.painter.stroke_color().unwrap(), Color::from_rgb8(0x00, 0x21, 0x85));
        assert_eq!(config.logging.style, LogStyle::Never);
        assert_eq!(config.resolve_tip_dir(), PathBuf::from("/opt/tips"));
        assert!(config.resolve_brushes_path().unwrap().ends_with("brushes.json"));
    }

    #[test]
    fn test_logging_section_is_optional() {
        let trimmed: String = SAMPLE
            .lines()
            .filter(|l| !l.starts_with("filter") && !l.starts_with("style") && *l != "[logging]")
            .collect::<Vec<_>>()
            .join("\n");
        let config = Config::parse(&trimmed).unwrap();
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_errors() {
        assert!(matches!(Config::parse("[canvas]\nwidth = 1"), Err(ConfigError::Toml(_))));
        assert!(matches!(
            Config::load_from_path("/definitely/not/here/config.toml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
