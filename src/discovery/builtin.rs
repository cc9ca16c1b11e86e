//! Built-in exclusions applied to every walk.
//!
//! These names are filtered out before gitignore or `.blobify` rules run,
//! so no override pattern can bring them back.

/// Names excluded from every scan, matched exactly against file and
/// directory names at any depth.
pub static BUILTIN_EXCLUDED_NAMES: &[&str] = &[
    // Version control metadata
    ".git",
    ".svn",
    ".hg",
    // Editor and IDE state
    ".idea",
    ".vscode",
    ".vs",
    // Dependency trees and package caches
    "node_modules",
    "bower_components",
    "vendor",
    "packages",
    ".npm",
    ".yarn",
    "pip-wheel-metadata",
    // Virtual environments
    "venv",
    "env",
    ".env",
    ".venv",
    // Tool caches
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    // Build output
    "dist",
    "build",
    "target",
    "out",
    "obj",
    "Debug",
    "release",
    "Release",
    // Key material and certificate stores
    "certs",
    "certificates",
    "keys",
    "private",
    "ssl",
    ".ssh",
    "tls",
    ".gpg",
    ".keyring",
    ".gnupg",
    // Lockfiles with no readable content
    "package-lock.json",
];

/// Check if a file or directory name is excluded by the built-in set or the
/// leading-dot rule.
pub fn is_builtin_excluded(name: &str) -> bool {
    name.starts_with('.') || BUILTIN_EXCLUDED_NAMES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vcs_and_dependency_dirs_excluded() {
        assert!(is_builtin_excluded(".git"));
        assert!(is_builtin_excluded("node_modules"));
        assert!(is_builtin_excluded("__pycache__"));
        assert!(is_builtin_excluded("target"));
    }

    #[test]
    fn test_dot_prefixed_names_excluded() {
        assert!(is_builtin_excluded(".hidden"));
        assert!(is_builtin_excluded(".DS_Store"));
        assert!(is_builtin_excluded(".blobify"));
    }

    #[test]
    fn test_lockfile_excluded_by_name() {
        assert!(is_builtin_excluded("package-lock.json"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert!(is_builtin_excluded("Debug"));
        assert!(!is_builtin_excluded("debug"));
        assert!(is_builtin_excluded("release"));
        assert!(is_builtin_excluded("Release"));
    }

    #[test]
    fn test_ordinary_names_pass() {
        assert!(!is_builtin_excluded("src"));
        assert!(!is_builtin_excluded("main.py"));
        assert!(!is_builtin_excluded("README.md"));
        assert!(!is_builtin_excluded("docs"));
    }
}
