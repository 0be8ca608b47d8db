//! Configuration loading
//!
//! The player reads a single TOML file at startup. Every field is optional:
//! a missing file or a missing section falls back to built-in defaults, so
//! the player always starts with a usable configuration. Values cannot change
//! while running.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Default transition screen duration in seconds
pub const TRANSITION_DURATION: u64 = 2;

/// Default idle screen duration in seconds
pub const IDLE_DURATION: u64 = 20;

/// Bundled transition background file name
pub const TRANSITION_BG_NAME: &str = "transition.png";

/// Bundled idle background file name
pub const IDLE_BG_NAME: &str = "idle.png";

/// Environment variable overriding the bundled share directory
pub const SHARE_DIR_ENV: &str = "KARAPLAY_SHARE_DIR";

/// Player configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Folder song file paths are relative to
    pub kara_folder: PathBuf,

    /// Ask the engine for fullscreen output
    pub fullscreen: bool,

    pub durations: DurationsConfig,
    pub backgrounds: BackgroundsConfig,
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

/// Screen durations, in seconds
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DurationsConfig {
    pub transition_duration: Option<u64>,
    pub idle_duration: Option<u64>,
}

/// Custom background lookup
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BackgroundsConfig {
    /// Directory searched for custom backgrounds
    pub directory: Option<PathBuf>,

    /// Directory of the bundled backgrounds (defaults to the share directory)
    pub default_directory: Option<PathBuf>,

    pub transition_background_name: Option<String>,
    pub idle_background_name: Option<String>,
}

/// Parameters forwarded to the playback engine
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Passed once when the engine instance is created
    pub instance_parameters: Vec<String>,

    /// Attached to every media the player loads
    pub media_parameters: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Resolved screen durations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Durations {
    pub transition: Duration,
    pub idle: Duration,
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            transition: Duration::from_secs(TRANSITION_DURATION),
            idle: Duration::from_secs(IDLE_DURATION),
        }
    }
}

impl DurationsConfig {
    /// Apply overrides on top of the default durations
    pub fn resolve(&self) -> Durations {
        let defaults = Durations::default();
        Durations {
            transition: self
                .transition_duration
                .map(Duration::from_secs)
                .unwrap_or(defaults.transition),
            idle: self
                .idle_duration
                .map(Duration::from_secs)
                .unwrap_or(defaults.idle),
        }
    }
}

impl BackgroundsConfig {
    /// Directory holding the bundled backgrounds
    pub fn default_directory(&self) -> PathBuf {
        self.default_directory
            .clone()
            .unwrap_or_else(|| share_dir().join("backgrounds"))
    }
}

impl PlayerConfig {
    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    ///
    /// A missing file is not an error: a warning is logged and defaults are
    /// used. A file that exists but cannot be read or parsed is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(
                "Config file {} not found, using default configuration",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;

        info!("Loaded TOML configuration from {}", path.display());
        Ok(config)
    }
}

/// Directory holding bundled player assets
///
/// Priority order:
/// 1. `KARAPLAY_SHARE_DIR` environment variable
/// 2. Platform data directory (`~/.local/share/karaplay` on Linux)
/// 3. `./share` (fallback)
pub fn share_dir() -> PathBuf {
    if let Ok(path) = std::env::var(SHARE_DIR_ENV) {
        return PathBuf::from(path);
    }

    dirs::data_dir()
        .map(|d| d.join("karaplay"))
        .unwrap_or_else(|| PathBuf::from("./share"))
}
