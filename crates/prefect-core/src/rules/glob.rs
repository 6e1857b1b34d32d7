//! Forbidden file patterns

use super::{Check, report};
use crate::Result;
use crate::repo::{FilePattern, Repo, Search};

/// Decides whether a matching repository-relative path is allowed anyway.
pub type GlobException = fn(&Repo, &str) -> bool;

/// No file under `subdirectory` (recursively) may match `pattern`.
#[derive(Debug, Clone)]
pub struct FileGlobDoesNotExistRule {
    subdirectory: String,
    pattern: FilePattern,
    exception: Option<GlobException>,
}

impl FileGlobDoesNotExistRule {
    /// Forbid `pattern` anywhere in the repository.
    pub fn new(pattern: &str) -> Result<Self> {
        Self::under("", pattern)
    }

    /// Forbid `pattern` below `subdirectory`.
    pub fn under(subdirectory: &str, pattern: &str) -> Result<Self> {
        Ok(Self {
            subdirectory: subdirectory.to_string(),
            pattern: FilePattern::new(pattern)?,
            exception: None,
        })
    }

    pub fn with_exception(mut self, exception: GlobException) -> Self {
        self.exception = Some(exception);
        self
    }
}

impl Check for FileGlobDoesNotExistRule {
    fn description(&self) -> String {
        if self.subdirectory.is_empty() {
            format!("Files matching '{}' do not exist", self.pattern)
        } else {
            format!(
                "Files matching '{}' under '{}' do not exist",
                self.pattern, self.subdirectory
            )
        }
    }

    fn validate(&self, repo: &Repo) -> Result<Option<String>> {
        let mut lines = Vec::new();
        for file in repo.files(&self.subdirectory, &self.pattern, Search::Recursive)? {
            let file = file?;
            if self.exception.is_some_and(|allowed| allowed(repo, &file.relative)) {
                continue;
            }
            lines.push(format!(
                "File '{}' matches '{}' which must not exist.",
                file.relative, self.pattern
            ));
        }
        Ok(report(lines))
    }
}
