//! Error types for kinetype_heading

use std::path::PathBuf;

use kinetype_animation::EaseParseError;
use kinetype_core::ColorParseError;
use thiserror::Error;

/// Errors raised while building or loading a heading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("duration must be a positive number of seconds, got {0}")]
    InvalidDuration(f32),

    #[error("scale must be a positive number, got {0}")]
    InvalidScale(f32),

    #[error("adjacent stagger must be a non-negative number of seconds, got {0}")]
    InvalidStagger(f32),

    #[error(transparent)]
    Ease(#[from] EaseParseError),

    #[error(transparent)]
    Color(#[from] ColorParseError),

    #[error("unknown preset `{0}`")]
    UnknownPreset(String),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
