//! Repository root detection
//!
//! A command-line argument is either a repository root or a directory whose
//! immediate children are repository roots.

use std::fs;
use std::path::{Path, PathBuf};

use prefect_fs::canonicalize;

use crate::{Error, Result};

/// Check whether `path` is the root of a git work tree.
///
/// Both a `.git` directory and a `.git` file (worktrees, submodules) count.
pub fn is_repository_root(path: &Path) -> bool {
    path.join(".git").exists()
}

/// Resolve an argument into the repository roots it designates.
///
/// Children are returned in name order.
///
/// # Errors
///
/// Returns [`Error::NoRepositories`] when `path` is neither a repository
/// root nor a directory containing any.
pub fn resolve(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Err(Error::NoRepositories {
            path: path.to_path_buf(),
        });
    }

    let path = canonicalize(path)?;

    if is_repository_root(&path) {
        return Ok(vec![path]);
    }

    let entries = fs::read_dir(&path).map_err(|e| prefect_fs::Error::io(&path, e))?;
    let mut roots = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| prefect_fs::Error::io(&path, e))?;
        let child = entry.path();
        if child.is_dir() && is_repository_root(&child) {
            roots.push(child);
        }
    }

    if roots.is_empty() {
        return Err(Error::NoRepositories { path });
    }

    roots.sort();
    tracing::debug!(container = %path.display(), count = roots.len(), "discovered repositories");
    Ok(roots)
}
