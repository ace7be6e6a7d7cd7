// src/logging/init.rs
//
// One-time env_logger setup for the demo and for hosts embedding the crate.

use serde::Deserialize;
use std::sync::Once;

/// Coloring of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStyle {
    #[default]
    Auto,
    Always,
    Never,
}

impl From<LogStyle> for env_logger::WriteStyle {
    fn from(style: LogStyle) -> Self {
        match style {
            LogStyle::Auto => env_logger::WriteStyle::Auto,
            LogStyle::Always => env_logger::WriteStyle::Always,
            LogStyle::Never => env_logger::WriteStyle::Never,
        }
    }
}

/// `filter` uses the env_logger syntax, e.g. "info" or
/// "brushwork=debug,wgpu=warn". Without it, RUST_LOG applies.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: Option<String>,
    pub style: LogStyle,
}

static INIT: Once = Once::new();

/// Installs the global logger. Later calls are no-ops.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = &config.filter {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.write_style(config.style.into());
        // A host may already own the logger
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized");
    });
}
