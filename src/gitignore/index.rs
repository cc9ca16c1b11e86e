//! Hierarchical gitignore evaluation.
//!
//! One pattern level per directory that owns a `.gitignore`, with the root
//! level fronted by the user's global excludes file. Levels apply root to
//! leaf and the last matching pattern wins, so deeper rules override
//! shallower ones and a negation can un-ignore an earlier match.

use crate::gitignore::pattern::GlobPattern;
use crate::gitignore::slash_path;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Patterns declared by one directory's ignore file.
#[derive(Debug)]
struct IgnoreLevel {
    dir: PathBuf,
    patterns: Vec<GlobPattern>,
}

/// All applicable ignore rules for a repository, indexed by the directory
/// that declared them.
#[derive(Debug, Default)]
pub struct GitignoreIndex {
    levels: Vec<IgnoreLevel>,
}

impl GitignoreIndex {
    /// Build the index for `root` from the root `.gitignore` and every
    /// nested `.gitignore` that is not itself inside an ignored directory.
    pub fn build(root: &Path) -> Self {
        Self::build_with_global(root, None)
    }

    /// Like [`GitignoreIndex::build`], with an optional global excludes file
    /// whose patterns front the root level.
    pub fn build_with_global(root: &Path, global_file: Option<&Path>) -> Self {
        let mut index = Self::default();

        let mut root_patterns = Vec::new();
        if let Some(global_file) = global_file {
            root_patterns.extend(read_patterns(global_file));
        }
        root_patterns.extend(read_patterns(&root.join(".gitignore")));
        if !root_patterns.is_empty() {
            index.levels.push(IgnoreLevel {
                dir: root.to_path_buf(),
                patterns: root_patterns,
            });
        }

        // Top-down walk so ancestor levels are in place before a nested
        // .gitignore is considered; ignore files inside directories the
        // rules so far already ignore are never loaded.
        let mut walker = WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter();
        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    debug!(%error, "walk error while indexing ignore files");
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }
            if index.is_ignored(entry.path(), true) {
                debug!(
                    dir = %entry.path().display(),
                    "skipping ignore files under ignored directory"
                );
                walker.skip_current_dir();
                continue;
            }
            let ignore_file = entry.path().join(".gitignore");
            if ignore_file.is_file() {
                let patterns = read_patterns(&ignore_file);
                if !patterns.is_empty() {
                    debug!(
                        dir = %entry.path().display(),
                        count = patterns.len(),
                        "loaded nested ignore file"
                    );
                    index.levels.push(IgnoreLevel {
                        dir: entry.path().to_path_buf(),
                        patterns,
                    });
                }
            }
        }

        debug!(
            levels = index.levels.len(),
            patterns = index.pattern_count(),
            "gitignore index built"
        );
        index
    }

    /// Total number of compiled patterns across all levels.
    pub fn pattern_count(&self) -> usize {
        self.levels.iter().map(|level| level.patterns.len()).sum()
    }

    /// Whether the index holds any rules at all.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Decide whether `path` is ignored, checking every level that contains
    /// it from the root down. Each matching pattern overwrites the running
    /// answer, so the last match at the deepest level wins.
    pub fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        let mut ignored = false;
        for level in &self.levels {
            let Ok(rel) = path.strip_prefix(&level.dir) else {
                continue;
            };
            if rel.as_os_str().is_empty() {
                continue;
            }
            let rel = slash_path(rel);
            for pattern in &level.patterns {
                if pattern.matches(&rel, is_dir) {
                    ignored = !pattern.is_negated();
                }
            }
        }
        ignored
    }
}

/// Read and compile one ignore file, tolerating a missing or unreadable
/// file and dropping malformed patterns.
fn read_patterns(path: &Path) -> Vec<GlobPattern> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(error) => {
            if path.exists() {
                debug!(path = %path.display(), %error, "could not read ignore file");
            }
            return Vec::new();
        }
    };

    let mut patterns = Vec::new();
    for line in String::from_utf8_lossy(&bytes).lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match GlobPattern::compile(line) {
            Ok(pattern) => patterns.push(pattern),
            Err(error) => {
                warn!(pattern = line, %error, "dropping malformed ignore pattern");
            }
        }
    }
    patterns
}
