//! Error types for topo-blocks crates.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using DesignError.
pub type DesignResult<T> = Result<T, DesignError>;

/// Primary error type for design generation.
#[derive(Debug, Error)]
pub enum DesignError {
    // === Input errors ===
    #[error("input not found: {0}")]
    MissingFile(PathBuf),

    #[error("invalid input geometry: {0}")]
    InvalidInput(String),

    #[error("invalid bounds: {0}")]
    InvalidBounds(String),

    // === Configuration errors ===
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    #[error("unknown palette: {0}")]
    UnknownPalette(String),

    // === Output errors ===
    #[error("rendering failed: {0}")]
    Render(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DesignError {
    /// A short stable tag for this error kind, used in batch reports.
    pub fn kind(&self) -> &'static str {
        match self {
            DesignError::MissingFile(_) => "missing_file",
            DesignError::InvalidInput(_) => "invalid_input",
            DesignError::InvalidBounds(_) => "invalid_bounds",
            DesignError::InvalidConfig(_) => "invalid_config",
            DesignError::InvalidPalette(_) => "invalid_palette",
            DesignError::UnknownPalette(_) => "unknown_palette",
            DesignError::Render(_) => "render",
            DesignError::Io(_) => "io",
        }
    }
}

impl From<serde_json::Error> for DesignError {
    fn from(err: serde_json::Error) -> Self {
        DesignError::InvalidInput(format!("JSON error: {}", err))
    }
}
