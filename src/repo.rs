//! Upstream repository sync
//!
//! Shells out to `git` the same way the transfer layer shells out to rsync:
//! spawn, check the exit status, map failure into a typed error. The clone is
//! shallow and single-branch; any git failure aborts the run. There are no
//! retries.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::UpstreamConfig;
use crate::error::{MirrorError, MirrorResult};

/// Delete any existing checkout and clone the upstream branch fresh
///
/// Returns the checkout directory on success.
pub fn sync(config: &UpstreamConfig, root: &Path) -> MirrorResult<PathBuf> {
    let repo_dir = root.join(&config.dir);
    if repo_dir.exists() {
        fs::remove_dir_all(&repo_dir)?;
    }

    let status = Command::new("git")
        .arg("clone")
        .arg("--depth=1")
        .arg("-b")
        .arg(&config.branch)
        .arg(&config.url)
        .arg(&repo_dir)
        .status()
        .map_err(|e| MirrorError::GitSpawn {
            action: "clone".to_string(),
            source: e,
        })?;

    if !status.success() {
        return Err(MirrorError::Git {
            action: "clone".to_string(),
            code: status.code(),
        });
    }

    Ok(repo_dir)
}

/// Resolve the short commit hash of the checkout
///
/// Runs even when the clone step was skipped, so a missing checkout fails
/// here rather than later in the pipeline.
pub fn resolve_commit(repo_dir: &Path) -> MirrorResult<String> {
    let output = Command::new("git")
        .arg("rev-parse")
        .arg("--short")
        .arg("HEAD")
        .current_dir(repo_dir)
        .output()
        .map_err(|e| MirrorError::GitSpawn {
            action: "rev-parse".to_string(),
            source: e,
        })?;

    if !output.status.success() {
        return Err(MirrorError::Git {
            action: "rev-parse".to_string(),
            code: output.status.code(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_commit_missing_checkout() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("ScratchAddons");

        // No checkout at all: the reuse flag only skips re-cloning, it does
        // not remove the dependency on a pre-existing one.
        let result = resolve_commit(&missing);
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_commit_not_a_repository() {
        let dir = tempdir().unwrap();

        let result = resolve_commit(dir.path());
        assert!(result.is_err());
    }
}
