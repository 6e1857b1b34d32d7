//! Newline-delimited file index parsing
//!
//! Template control files list one relative path per line:
//!
//! ```text
//! # Comments and blank lines are ignored
//! build/Version.props
//!   docs/index.md    <- indentation and trailing whitespace are trimmed
//! \#literal-hash.txt <- a leading backslash escapes a literal '#'
//! ```

use std::collections::HashSet;
use std::path::Path;

use crate::path::normalize_separators;
use crate::{Error, Result};

/// An ordered set of relative paths read from a file index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileIndex {
    paths: Vec<String>,
    lookup: HashSet<String>,
}

impl FileIndex {
    /// Parse index text. Duplicate entries keep their first position.
    pub fn parse(text: &str) -> Self {
        let mut index = Self::default();

        for line in text.lines() {
            let path = line.trim();

            if path.is_empty() || path.starts_with('#') {
                continue;
            }

            let path = path.strip_prefix('\\').filter(|rest| rest.starts_with('#')).unwrap_or(path);
            let path = normalize_separators(path);

            if index.lookup.insert(path.clone()) {
                index.paths.push(path);
            }
        }

        index
    }

    /// Load an index from disk. A missing file yields an empty index.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let index = Self::parse(&text);
        tracing::debug!(path = %path.display(), entries = index.len(), "loaded file index");
        Ok(index)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.lookup.contains(path)
    }

    /// Entries in file order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
