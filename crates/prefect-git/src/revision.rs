//! Checked-out revision lookup

use std::path::Path;

use git2::{ErrorCode, Repository};

use crate::Result;

/// Commit id currently checked out in the work tree at `path`.
///
/// Returns `None` when nothing is checked out there (missing directory,
/// uninitialized submodule, unborn branch).
pub fn checked_out_revision(path: &Path) -> Result<Option<String>> {
    if !path.join(".git").exists() {
        return Ok(None);
    }

    let repo = match Repository::open(path) {
        Ok(repo) => repo,
        Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let head = match repo.head() {
        Ok(head) => head,
        Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let commit = head.peel_to_commit()?;
    Ok(Some(commit.id().to_string()))
}
