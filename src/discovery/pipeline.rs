//! Two-sweep discovery pipeline.
//!
//! Sweep one walks the tree under built-in and gitignore pruning and
//! classifies every text file it reaches. Sweep two re-walks without
//! gitignore pruning and applies the resolved `.blobify` rules in
//! declaration order, so override patterns can reach into VCS-ignored
//! subtrees.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::{BlobifyConfig, ConfigRule, ResolvedContext};
use crate::error::ScanError;
use crate::git;
use crate::gitignore::{GitignoreIndex, GlobPattern, slash_path};

use super::builtin::is_builtin_excluded;
use super::text_detection::is_text_file;
use super::types::{DiscoveredFile, DiscoverySnapshot, FileState};

/// A file reachable by the second sweep, with the two relative spellings
/// the override pass needs.
struct Candidate {
    path: PathBuf,
    /// Relative to the rule anchor, for pattern matching.
    anchor_rel: String,
    /// Relative to the scan root, for record keeping.
    root_rel: String,
}

/// Configurable entry point for file discovery.
pub struct Scanner {
    root: PathBuf,
    context: Option<String>,
}

impl Scanner {
    /// Create a scanner for a directory. The root is canonicalized so the
    /// snapshot carries stable paths regardless of how it was spelled.
    pub fn new(root: &Path) -> Result<Self, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::NotADirectory(root.display().to_string()));
        }
        let root = root
            .canonicalize()
            .map_err(|source| ScanError::ResolveRoot {
                path: root.display().to_string(),
                source,
            })?;
        Ok(Self {
            root,
            context: None,
        })
    }

    /// Select a named `.blobify` context for this scan.
    pub fn with_context(mut self, context: &str) -> Self {
        self.context = Some(context.to_string());
        self
    }

    /// Run both sweeps and produce the ordered snapshot.
    pub fn scan(&self) -> Result<DiscoverySnapshot, ScanError> {
        let git_root = git::find_git_root(&self.root);
        let anchor = git_root.clone().unwrap_or_else(|| self.root.clone());
        debug!(
            root = %self.root.display(),
            git_root = ?git_root,
            "starting discovery"
        );

        let config = BlobifyConfig::from_file(&anchor.join(".blobify"))?;
        let resolved = config.resolve(self.context.as_deref())?;

        // Gitignore rules only apply inside a git repository.
        let ignore_index = match &git_root {
            Some(repo_root) => {
                let global = git::global_excludes_file(repo_root);
                GitignoreIndex::build_with_global(repo_root, global.as_deref())
            }
            None => GitignoreIndex::default(),
        };
        debug!(
            patterns = ignore_index.pattern_count(),
            "gitignore index ready"
        );

        let (mut files, index_of, mut skipped_dirs) = self.first_sweep(&ignore_index);
        debug!(files = files.len(), "first sweep complete");

        if resolved.has_patterns() {
            self.apply_overrides(&resolved, &anchor, &mut files, &index_of);
        }

        files.sort_by(|a, b| {
            a.relative_path
                .to_lowercase()
                .cmp(&b.relative_path.to_lowercase())
                .then_with(|| a.relative_path.cmp(&b.relative_path))
        });
        skipped_dirs.sort_by(|a, b| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        });

        Ok(DiscoverySnapshot::new(
            self.root.clone(),
            git_root,
            resolved,
            files,
            skipped_dirs,
        ))
    }

    /// Walk under built-in and gitignore pruning, classifying text files.
    fn first_sweep(
        &self,
        ignore_index: &GitignoreIndex,
    ) -> (Vec<DiscoveredFile>, HashMap<String, usize>, Vec<String>) {
        let mut files = Vec::new();
        let mut index_of = HashMap::new();
        let mut skipped_dirs = Vec::new();

        let mut walker = WalkDir::new(&self.root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter();
        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    warn!(%error, "skipping unreadable entry");
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy();
            let is_dir = entry.file_type().is_dir();

            if is_builtin_excluded(&name) {
                if is_dir {
                    walker.skip_current_dir();
                }
                continue;
            }
            if is_dir {
                // Ignored directories are pruned whole. Ignore files inside
                // them are never loaded and negations cannot resurrect them.
                if ignore_index.is_ignored(entry.path(), true) {
                    if let Ok(rel) = entry.path().strip_prefix(&self.root) {
                        skipped_dirs.push(slash_path(rel));
                    }
                    walker.skip_current_dir();
                }
                continue;
            }
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            if !is_text_file(entry.path()) {
                debug!(path = %rel.display(), "skipping non-text file");
                continue;
            }

            let state = if ignore_index.is_ignored(entry.path(), false) {
                FileState::VcsIgnored
            } else {
                FileState::Included
            };
            let relative_path = slash_path(rel);
            index_of.insert(relative_path.clone(), files.len());
            files.push(DiscoveredFile {
                path: entry.path().to_path_buf(),
                relative_path,
                state,
            });
        }

        (files, index_of, skipped_dirs)
    }

    /// Apply the resolved rules in declaration order over a second walk that
    /// skips only built-in exclusions.
    fn apply_overrides(
        &self,
        resolved: &ResolvedContext,
        anchor: &Path,
        files: &mut Vec<DiscoveredFile>,
        index_of: &HashMap<String, usize>,
    ) {
        let candidates = self.collect_candidates(anchor);
        debug!(
            candidates = candidates.len(),
            rules = resolved.rules().len(),
            "applying override rules"
        );

        // Files admitted by includes this sweep, keyed by root-relative path
        // so a later exclude can drop them again.
        let mut pending: HashMap<String, PathBuf> = HashMap::new();

        for rule in resolved.rules() {
            let (text, is_include) = match rule {
                ConfigRule::Include(pattern) => (pattern, true),
                ConfigRule::Exclude(pattern) => (pattern, false),
                ConfigRule::Switch(_) => continue,
            };
            let pattern = match GlobPattern::compile(text) {
                Ok(pattern) => pattern,
                Err(error) => {
                    warn!(pattern = %text, %error, "dropping malformed override pattern");
                    continue;
                }
            };

            for candidate in &candidates {
                if !pattern.matches(&candidate.anchor_rel, false) {
                    continue;
                }
                if is_include {
                    if let Some(&slot) = index_of.get(&candidate.root_rel) {
                        files[slot].state = FileState::OverrideIncluded;
                    } else if !pending.contains_key(&candidate.root_rel) {
                        // A literal pattern names one file and bypasses the
                        // text check; globs still require it.
                        if pattern.is_literal() || is_text_file(&candidate.path) {
                            pending
                                .insert(candidate.root_rel.clone(), candidate.path.clone());
                        } else {
                            debug!(
                                path = %candidate.root_rel,
                                pattern = %text,
                                "include match failed text check"
                            );
                        }
                    }
                } else {
                    if let Some(&slot) = index_of.get(&candidate.root_rel) {
                        // A VCS-ignored entry keeps its label; it is already
                        // out of the output.
                        if files[slot].state != FileState::VcsIgnored {
                            files[slot].state = FileState::OverrideExcluded;
                        }
                    }
                    pending.remove(&candidate.root_rel);
                }
            }
        }

        for (relative_path, path) in pending {
            files.push(DiscoveredFile {
                path,
                relative_path,
                state: FileState::OverrideIncluded,
            });
        }
    }

    /// Walk applying only built-in exclusions, collecting every file the
    /// override rules may address.
    fn collect_candidates(&self, anchor: &Path) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        let mut walker = WalkDir::new(&self.root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter();
        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    warn!(%error, "skipping unreadable entry");
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy();
            if is_builtin_excluded(&name) {
                if entry.file_type().is_dir() {
                    walker.skip_current_dir();
                }
                continue;
            }
            if !entry.file_type().is_file() {
                continue;
            }
            let (Ok(anchor_rel), Ok(root_rel)) = (
                entry.path().strip_prefix(anchor),
                entry.path().strip_prefix(&self.root),
            ) else {
                continue;
            };
            candidates.push(Candidate {
                path: entry.path().to_path_buf(),
                anchor_rel: slash_path(anchor_rel),
                root_rel: slash_path(root_rel),
            });
        }
        candidates
    }
}
