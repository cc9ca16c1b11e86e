//! Configuration error types.

/// Error raised while parsing or resolving a `.blobify` file.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot redefine 'default' context (line {line})")]
    RedefinedDefault { line: usize },

    #[error("Context '{name}' already defined (line {line})")]
    DuplicateContext { name: String, line: usize },

    #[error("Parent context(s) not found: {missing}")]
    ParentNotFound { context: String, missing: String },
}
