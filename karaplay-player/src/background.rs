//! Background resolution
//!
//! Picks the idle and transition background files once, at construction.
//! A custom file is used when configured and present; otherwise the bundled
//! default is used. If the default is missing too the installation is
//! broken and construction fails.

use crate::error::{Error, Result};
use karaplay_common::config::{BackgroundsConfig, IDLE_BG_NAME, TRANSITION_BG_NAME};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Resolved background files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backgrounds {
    pub transition: PathBuf,
    pub idle: PathBuf,
}

/// File names for each background kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackgroundNames<T> {
    pub transition: T,
    pub idle: T,
}

/// Resolves background files from custom and default locations
#[derive(Debug, Clone)]
pub struct BackgroundResolver {
    directory: Option<PathBuf>,
    default_directory: PathBuf,
    background_filenames: BackgroundNames<Option<String>>,
    default_background_filenames: BackgroundNames<String>,
}

impl BackgroundResolver {
    pub fn new(
        directory: Option<PathBuf>,
        default_directory: PathBuf,
        background_filenames: BackgroundNames<Option<String>>,
        default_background_filenames: BackgroundNames<String>,
    ) -> Self {
        Self {
            directory,
            default_directory,
            background_filenames,
            default_background_filenames,
        }
    }

    /// Build a resolver from configuration with the bundled file names
    pub fn from_config(config: &BackgroundsConfig) -> Self {
        Self::new(
            config.directory.clone(),
            config.default_directory(),
            BackgroundNames {
                transition: config.transition_background_name.clone(),
                idle: config.idle_background_name.clone(),
            },
            BackgroundNames {
                transition: TRANSITION_BG_NAME.to_string(),
                idle: IDLE_BG_NAME.to_string(),
            },
        )
    }

    pub fn resolve(&self) -> Result<Backgrounds> {
        Ok(Backgrounds {
            transition: self.resolve_one(
                "transition",
                self.background_filenames.transition.as_deref(),
                &self.default_background_filenames.transition,
            )?,
            idle: self.resolve_one(
                "idle",
                self.background_filenames.idle.as_deref(),
                &self.default_background_filenames.idle,
            )?,
        })
    }

    fn resolve_one(
        &self,
        kind: &str,
        custom_name: Option<&str>,
        default_name: &str,
    ) -> Result<PathBuf> {
        if let Some(name) = custom_name {
            match self.directory.as_deref().map(|dir| dir.join(name)) {
                Some(path) if path.is_file() => {
                    debug!("Using custom {} background {}", kind, path.display());
                    return Ok(path);
                }
                Some(path) => warn!(
                    "Custom {} background {} not found, using default one",
                    kind,
                    path.display()
                ),
                None => warn!(
                    "Custom {} background '{}' given without a directory, using default one",
                    kind, name
                ),
            }
        }

        let default_path = self.default_directory.join(default_name);
        if default_path.is_file() {
            debug!("Using default {} background {}", kind, default_path.display());
            return Ok(default_path);
        }

        Err(Error::Config(format!(
            "No {} background file found (default {} missing)",
            kind,
            default_path.display()
        )))
    }
}
