//! Version-control ignore matching
//!
//! File enumeration consults an [`IgnoreMatcher`] for every entry so that
//! build outputs and restored package folders never reach the rules.

use std::path::{Path, PathBuf};

use git2::Repository;

use crate::Result;

/// Decides whether a path relative to the repository root is ignored.
pub trait IgnoreMatcher: std::fmt::Debug {
    /// `relative` uses forward slashes and has no leading or trailing slash.
    fn is_ignored(&self, relative: &str, is_dir: bool) -> bool;
}

/// Matcher that never ignores anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIgnore;

impl IgnoreMatcher for NoIgnore {
    fn is_ignored(&self, _relative: &str, _is_dir: bool) -> bool {
        false
    }
}

/// Matcher backed by the repository's own `.gitignore` rules.
pub struct GitIgnore {
    repo: Repository,
    root: PathBuf,
}

impl GitIgnore {
    /// Open the git work tree rooted at `root`.
    pub fn open(root: &Path) -> Result<Self> {
        let repo = Repository::open(root)?;
        Ok(Self {
            repo,
            root: root.to_path_buf(),
        })
    }
}

impl std::fmt::Debug for GitIgnore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitIgnore").field("root", &self.root).finish()
    }
}

impl IgnoreMatcher for GitIgnore {
    fn is_ignored(&self, relative: &str, is_dir: bool) -> bool {
        // A trailing slash lets directory-only patterns such as `/artifacts/` match
        let query = if is_dir {
            format!("{relative}/")
        } else {
            relative.to_string()
        };

        match self.repo.is_path_ignored(&query) {
            Ok(ignored) => ignored,
            Err(e) => {
                tracing::warn!(path = %relative, error = %e, "ignore lookup failed, treating path as tracked");
                false
            }
        }
    }
}

/// Pick the matcher for a candidate repository root.
///
/// Roots that are not git work trees fall back to [`NoIgnore`].
pub fn for_root(root: &Path) -> Box<dyn IgnoreMatcher> {
    match GitIgnore::open(root) {
        Ok(matcher) => Box::new(matcher),
        Err(e) => {
            tracing::debug!(root = %root.display(), error = %e, "not a git work tree, ignore rules disabled");
            Box::new(NoIgnore)
        }
    }
}
