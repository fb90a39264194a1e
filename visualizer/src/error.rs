//! Error types for the visualizer.

use thiserror::Error;

/// Visualizer error type
#[derive(Error, Debug)]
pub enum VizError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl From<Box<dyn std::error::Error>> for VizError {
    fn from(e: Box<dyn std::error::Error>) -> Self {
        VizError::Backend(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VizError>;
