//! Git repository plumbing.
//!
//! The engine never shells out to git except for one configuration value:
//! the location of the user's global excludes file. That query is bounded by
//! a short timeout and every failure mode downgrades to "no global rules".

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tracing::debug;

const GIT_CONFIG_TIMEOUT: Duration = Duration::from_secs(5);

/// Locate the enclosing git repository root by walking up from `path`
/// looking for a `.git` entry.
pub fn find_git_root(path: &Path) -> Option<PathBuf> {
    let mut current = path;
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

/// Resolve the user's global excludes file via `git config core.excludesfile`.
///
/// Returns `None` when git is unavailable, the query times out or fails, the
/// value is unset, or the configured file does not exist.
pub fn global_excludes_file(git_root: &Path) -> Option<PathBuf> {
    let stdout = run_git_config(git_root)?;
    let value = String::from_utf8_lossy(&stdout).trim().to_string();
    if value.is_empty() {
        return None;
    }

    let path = expand_home(&value);
    if path.is_file() {
        debug!(path = %path.display(), "using global excludes file");
        Some(path)
    } else {
        debug!(path = %path.display(), "configured global excludes file does not exist");
        None
    }
}

fn run_git_config(git_root: &Path) -> Option<Vec<u8>> {
    let mut child = match Command::new("git")
        .args(["config", "--get", "core.excludesfile"])
        .current_dir(git_root)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => child,
        Err(error) => {
            debug!(%error, "git unavailable, skipping global excludes lookup");
            return None;
        }
    };

    let started = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if started.elapsed() >= GIT_CONFIG_TIMEOUT {
                    debug!("git config query timed out");
                    let _ = child.kill();
                    let _ = child.wait();
                    return None;
                }
                std::thread::sleep(Duration::from_millis(10));
            }
            Err(error) => {
                debug!(%error, "failed to wait for git config query");
                return None;
            }
        }
    };

    if !status.success() {
        // Exit code 1 just means the key is unset.
        return None;
    }

    let mut stdout = child.stdout.take()?;
    let mut buf = Vec::new();
    if let Err(error) = stdout.read_to_end(&mut buf) {
        debug!(%error, "failed to read git config output");
        return None;
    }
    Some(buf)
}

/// Expand a leading `~` the way git itself would.
fn expand_home(value: &str) -> PathBuf {
    if value == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(value));
    }
    if let Some(rest) = value.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(value)
}
