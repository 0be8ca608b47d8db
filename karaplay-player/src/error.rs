//! Error types for karaplay-player
//!
//! Defines module-specific error types using thiserror for clear error propagation.

use thiserror::Error;

/// Main error type for karaplay-player
#[derive(Error, Debug)]
pub enum Error {
    /// Errors raised by the shared library (configuration parsing, I/O)
    #[error(transparent)]
    Common(#[from] karaplay_common::Error),

    /// Missing or invalid configuration (fatal at construction)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Playback engine rejected a command
    #[error("Engine error: {0}")]
    Engine(String),

    /// Overlay text could not be produced
    #[error("Screen text error: {0}")]
    TextProvider(String),

    /// Invalid state for operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using karaplay-player Error
pub type Result<T> = std::result::Result<T, Error>;
