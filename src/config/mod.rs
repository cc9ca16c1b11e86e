//! `.blobify` configuration: named rule contexts with inheritance.
//!
//! A `.blobify` file holds ordered include/exclude patterns and output
//! switches, grouped into named contexts. Contexts inherit rules from
//! parents declared earlier in the file.
//!
//! ## Layers
//! - `parser`: line-oriented `.blobify` text parsing
//! - `resolver`: context inheritance resolution
//! - `error`: configuration error types

mod error;
mod parser;
mod resolver;

pub use error::ConfigError;

use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

/// Name of the implicit context that collects rules before any section header.
pub const DEFAULT_CONTEXT: &str = "default";

/// A single configuration rule, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigRule {
    /// `+pattern`: include files matching the pattern.
    Include(String),
    /// `-pattern`: exclude files matching the pattern.
    Exclude(String),
    /// `@switch`: toggle an output behavior.
    Switch(String),
}

/// A named section of a `.blobify` file.
#[derive(Debug, Clone)]
pub struct Context {
    name: String,
    parents: Vec<String>,
    rules: Vec<ConfigRule>,
    description: Option<String>,
}

impl Context {
    pub(crate) fn new(name: String, parents: Vec<String>, description: Option<String>) -> Self {
        Self {
            name,
            parents,
            rules: Vec::new(),
            description,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent context names, in declaration order.
    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    /// Description harvested from the comment line directly above the header.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Parsed form of a `.blobify` file: the default context plus named sections.
#[derive(Debug, Clone)]
pub struct BlobifyConfig {
    contexts: Vec<Context>,
}

impl Default for BlobifyConfig {
    fn default() -> Self {
        Self {
            contexts: vec![Context::new(DEFAULT_CONTEXT.to_string(), Vec::new(), None)],
        }
    }
}

impl BlobifyConfig {
    /// Parses `.blobify` text. The default context is always present, even
    /// when the text declares no rules before the first section header.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        parser::parse(text)
    }

    /// Loads a `.blobify` file. A missing or unreadable file yields the
    /// default configuration; only structural errors in the text are fatal.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read(path) {
            Ok(bytes) => Self::parse(&String::from_utf8_lossy(&bytes)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no .blobify file, using defaults");
                Ok(Self::default())
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "cannot read .blobify file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Resolves the requested context (or the default context when `None`)
    /// into a flat rule list with inherited rules prepended.
    pub fn resolve(&self, requested: Option<&str>) -> Result<ResolvedContext, ConfigError> {
        resolver::resolve(&self.contexts, requested)
    }

    /// All context names in declaration order, the default context first.
    pub fn context_names(&self) -> Vec<&str> {
        self.contexts.iter().map(|c| c.name.as_str()).collect()
    }

    /// Contexts declared with a section header, skipping the default context.
    pub fn named_contexts(&self) -> impl Iterator<Item = &Context> {
        self.contexts.iter().skip(1)
    }
}

/// A context flattened through its inheritance chain: inherited rules first,
/// own rules last, duplicates preserved.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedContext {
    name: String,
    rules: Vec<ConfigRule>,
}

impl ResolvedContext {
    pub(crate) fn new(name: &str, rules: Vec<ConfigRule>) -> Self {
        Self {
            name: name.to_string(),
            rules,
        }
    }

    pub(crate) fn empty(name: &str) -> Self {
        Self::new(name, Vec::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rules in effective order. Includes, excludes, and switches stay
    /// interleaved exactly as declared.
    pub fn rules(&self) -> &[ConfigRule] {
        &self.rules
    }

    /// Include patterns in effective order.
    pub fn include_patterns(&self) -> Vec<&str> {
        self.rules
            .iter()
            .filter_map(|rule| match rule {
                ConfigRule::Include(pattern) => Some(pattern.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Exclude patterns in effective order.
    pub fn exclude_patterns(&self) -> Vec<&str> {
        self.rules
            .iter()
            .filter_map(|rule| match rule {
                ConfigRule::Exclude(pattern) => Some(pattern.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Switch names in effective order, duplicates preserved.
    pub fn switches(&self) -> Vec<&str> {
        self.rules
            .iter()
            .filter_map(|rule| match rule {
                ConfigRule::Switch(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// True when any include or exclude pattern is present. Switch-only
    /// contexts do not trigger the pattern-application sweep.
    pub fn has_patterns(&self) -> bool {
        self.rules
            .iter()
            .any(|rule| !matches!(rule, ConfigRule::Switch(_)))
    }

    pub fn has_switch(&self, name: &str) -> bool {
        self.rules
            .iter()
            .any(|rule| matches!(rule, ConfigRule::Switch(s) if s == name))
    }
}
