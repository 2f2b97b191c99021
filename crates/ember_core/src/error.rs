//! # Engine Error Types
//!
//! Only configuration can fail. Mounting, ticking and resizing are total:
//! a missing surface yields an inert engine, not an error.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while preparing the particle engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configuration text is not valid TOML for [`crate::EngineConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration parsed but violates an engine invariant.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    /// Shorthand for [`EngineError::InvalidConfig`].
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
