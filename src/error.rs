//! Error types for the discovery pipeline.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by [`crate::discovery::Scanner`].
#[derive(Debug, Error)]
pub enum ScanError {
    /// The scan root does not exist or is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(String),

    /// The scan root exists but could not be resolved to a canonical path.
    #[error("Cannot resolve {path}: {source}")]
    ResolveRoot {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The `.blobify` file is structurally invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ScanError>;
