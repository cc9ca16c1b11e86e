//! Discovery result types.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::ResolvedContext;

/// Classification of a discovered file after every rule layer has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileState {
    /// Passed the built-in filters and the text heuristic, untouched by
    /// any override rule.
    Included,
    /// Matched by the gitignore index. Listed, but kept out of the output.
    VcsIgnored,
    /// Excluded by a `.blobify` rule.
    OverrideExcluded,
    /// Included by a `.blobify` rule.
    OverrideIncluded,
}

impl FileState {
    /// True when the file's content belongs in the final output.
    pub fn include_in_output(self) -> bool {
        matches!(self, FileState::Included | FileState::OverrideIncluded)
    }
}

/// A file recorded during discovery.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveredFile {
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Path relative to the scan root, `/`-separated.
    pub relative_path: String,
    pub state: FileState,
}

/// Result of a scan: the classified file list plus walk metadata.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoverySnapshot {
    root: PathBuf,
    git_root: Option<PathBuf>,
    context: ResolvedContext,
    files: Vec<DiscoveredFile>,
    skipped_dirs: Vec<String>,
}

impl DiscoverySnapshot {
    pub(crate) fn new(
        root: PathBuf,
        git_root: Option<PathBuf>,
        context: ResolvedContext,
        files: Vec<DiscoveredFile>,
        skipped_dirs: Vec<String>,
    ) -> Self {
        Self {
            root,
            git_root,
            context,
            files,
            skipped_dirs,
        }
    }

    /// Canonicalized scan root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Enclosing git repository root, when the scan root is inside one.
    pub fn git_root(&self) -> Option<&Path> {
        self.git_root.as_deref()
    }

    /// The resolved context the scan ran under.
    pub fn context(&self) -> &ResolvedContext {
        &self.context
    }

    /// Every recorded file, ordered case-insensitively by relative path.
    pub fn files(&self) -> &[DiscoveredFile] {
        &self.files
    }

    /// Directories pruned by the gitignore index, as relative paths.
    pub fn skipped_dirs(&self) -> &[String] {
        &self.skipped_dirs
    }

    /// Files whose content belongs in the output.
    pub fn included(&self) -> impl Iterator<Item = &DiscoveredFile> {
        self.files
            .iter()
            .filter(|file| file.state.include_in_output())
    }

    /// Files listed but suppressed by gitignore rules.
    pub fn vcs_ignored(&self) -> impl Iterator<Item = &DiscoveredFile> {
        self.files
            .iter()
            .filter(|file| file.state == FileState::VcsIgnored)
    }

    /// Files excluded by `.blobify` rules.
    pub fn override_excluded(&self) -> impl Iterator<Item = &DiscoveredFile> {
        self.files
            .iter()
            .filter(|file| file.state == FileState::OverrideExcluded)
    }
}
