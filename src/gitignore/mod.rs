//! Gitignore pattern compilation and hierarchical rule evaluation.

mod index;
mod pattern;

pub use index::GitignoreIndex;
pub use pattern::GlobPattern;

use std::path::Path;

/// Normalize a relative path to `/`-separated form for pattern matching.
pub(crate) fn slash_path(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(&component.as_os_str().to_string_lossy());
    }
    out
}
