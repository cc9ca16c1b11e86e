pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod git;
pub mod gitignore;

pub use cli::Cli;
pub use config::{
    BlobifyConfig, ConfigError, ConfigRule, Context, DEFAULT_CONTEXT, ResolvedContext,
};
pub use discovery::{DiscoveredFile, DiscoverySnapshot, FileState, Scanner};
pub use error::{Result, ScanError};
pub use gitignore::{GitignoreIndex, GlobPattern};
