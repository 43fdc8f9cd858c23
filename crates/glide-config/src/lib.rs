//! Glide configuration system
//!
//! Settings are loaded from `glide.toml` and may be overridden by
//! `GLIDE_*` environment variables. Every table is optional; missing keys
//! take their defaults.
//!
//! ```toml
//! [engine]
//! frame_rate = 60.0
//! pointer_time_constant = 0.08
//!
//! [viewport]
//! width = 1440.0
//! height = 900.0
//!
//! [demo]
//! frames = 600
//! scroll_speed = 900.0
//! coarse_pointer = false
//!
//! [logging]
//! filter = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Default configuration file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "glide.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlideConfig {
    /// Animation engine settings
    pub engine: EngineConfig,
    /// Simulated viewport size
    pub viewport: ViewportConfig,
    /// Headless demo run settings
    pub demo: DemoConfig,
    /// Log output settings
    pub logging: LoggingConfig,
}

/// Animation engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Display refresh rate the frame loop runs at
    pub frame_rate: f64,
    /// Smoothing time constant of the cursor ring, in seconds
    pub pointer_time_constant: f64,
    /// Smoothing time constant of the hero glow, in seconds
    pub glow_time_constant: f64,
}

/// Viewport configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
}

/// Headless demo configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Number of frames to simulate
    pub frames: u32,
    /// Scroll speed in pixels per second
    pub scroll_speed: f64,
    /// Pretend the device only has a coarse (touch) pointer
    pub coarse_pointer: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` env-filter directive, used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            pointer_time_constant: 0.08,
            glow_time_constant: 0.3,
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1440.0,
            height: 900.0,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            scroll_speed: 900.0,
            coarse_pointer: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Seconds per frame.
    pub fn frame_interval(&self) -> f64 {
        if self.frame_rate > 0.0 {
            1.0 / self.frame_rate
        } else {
            1.0 / 60.0
        }
    }
}

fn parse_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

fn parse_or_warn<T: std::str::FromStr>(key: &str, val: &str) -> Option<T> {
    let parsed = val.parse::<T>().ok();
    if parsed.is_none() {
        warn!(key, value = val, "ignoring unparsable environment override");
    }
    parsed
}

impl GlideConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from `glide.toml` in the current directory,
    /// or return the default configuration if it is missing or invalid
    pub fn load_or_default() -> Self {
        match Self::load_from_file(DEFAULT_CONFIG_FILE) {
            Ok(config) => config,
            Err(ConfigError::Read { .. }) => Self::default(),
            Err(err) => {
                warn!(error = %err, "using default configuration");
                Self::default()
            }
        }
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        self.merge_with_vars(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key/value source.
    pub fn merge_with_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("GLIDE_FRAME_RATE") {
            if let Some(rate) = parse_or_warn("GLIDE_FRAME_RATE", &val) {
                self.engine.frame_rate = rate;
            }
        }
        if let Some(val) = var("GLIDE_VIEWPORT_WIDTH") {
            if let Some(width) = parse_or_warn("GLIDE_VIEWPORT_WIDTH", &val) {
                self.viewport.width = width;
            }
        }
        if let Some(val) = var("GLIDE_VIEWPORT_HEIGHT") {
            if let Some(height) = parse_or_warn("GLIDE_VIEWPORT_HEIGHT", &val) {
                self.viewport.height = height;
            }
        }
        if let Some(val) = var("GLIDE_FRAMES") {
            if let Some(frames) = parse_or_warn("GLIDE_FRAMES", &val) {
                self.demo.frames = frames;
            }
        }
        if let Some(val) = var("GLIDE_SCROLL_SPEED") {
            if let Some(speed) = parse_or_warn("GLIDE_SCROLL_SPEED", &val) {
                self.demo.scroll_speed = speed;
            }
        }
        if let Some(val) = var("GLIDE_COARSE_POINTER") {
            self.demo.coarse_pointer = parse_flag(&val);
        }
        if let Some(filter) = var("GLIDE_LOG") {
            self.logging.filter = filter;
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from `path`, or `glide.toml` (defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_or_default(),
        };
        config.merge_with_env();
        Ok(config)
    }
}
