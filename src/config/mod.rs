pub mod config_load;
pub mod config_types;

pub use config_load::{Config, ConfigError};
pub use config_types::{CanvasConfig, PainterConfig, PathConfig};
