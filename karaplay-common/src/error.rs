//! Common error types for karaplay

use thiserror::Error;

/// Common result type for karaplay operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across karaplay crates
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML configuration file could not be parsed
    #[error("Configuration parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
