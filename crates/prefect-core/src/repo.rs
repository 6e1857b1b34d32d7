//! Candidate repositories and lazy file enumeration

use std::collections::VecDeque;
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};

use prefect_fs::NormalizedPath;
use prefect_git::IgnoreMatcher;

use crate::kind::TemplateKind;
use crate::template::PathTemplate;
use crate::{Error, Result};

/// Project name used when none can be derived.
pub const UNKNOWN_PROJECT: &str = "UNKNOWN";

/// One repository under validation.
///
/// A `Repo` is a snapshot: it is opened fresh for every reconciliation pass
/// so that the derived project name reflects fixups from the previous pass.
#[derive(Debug)]
pub struct Repo {
    root: PathBuf,
    slug: String,
    kind: TemplateKind,
    project_name: String,
    has_valid_project_name: bool,
    ignore: Box<dyn IgnoreMatcher>,
}

impl Repo {
    /// Open the repository at `root`, honouring its `.gitignore` when it is a
    /// git work tree.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` cannot be canonicalized or its solution
    /// directory cannot be read.
    pub fn open(root: &Path, kind: TemplateKind) -> Result<Self> {
        let root = prefect_fs::canonicalize(root)?;
        let ignore = prefect_git::ignore::for_root(&root);
        Self::with_ignore(root, kind, ignore)
    }

    /// Open a repository with an explicit ignore matcher.
    pub fn with_ignore(root: PathBuf, kind: TemplateKind, ignore: Box<dyn IgnoreMatcher>) -> Result<Self> {
        let slug = root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut repo = Self {
            root,
            slug,
            kind,
            project_name: UNKNOWN_PROJECT.to_string(),
            has_valid_project_name: false,
            ignore,
        };

        if let Some(name) = repo.derive_project_name()? {
            repo.project_name = name;
            repo.has_valid_project_name = true;
        }

        tracing::debug!(
            root = %repo.root.display(),
            project = %repo.project_name,
            derived = repo.has_valid_project_name,
            "opened repository"
        );
        Ok(repo)
    }

    /// Replace the derived project name.
    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = name.into();
        self.has_valid_project_name = true;
        self
    }

    /// Shortest solution file name in the solution directory; ties keep the
    /// first one seen.
    fn derive_project_name(&self) -> Result<Option<String>> {
        let pattern = FilePattern::new("*.sln")?;
        let mut shortest: Option<String> = None;

        for file in self.files(self.kind.solution_root(), &pattern, Search::TopLevel)? {
            let file = file?;
            let path = NormalizedPath::new(&file.relative);
            let Some(stem) = path.file_stem() else {
                continue;
            };
            if shortest.as_ref().is_none_or(|current| current.len() > stem.len()) {
                shortest = Some(stem.to_string());
            }
        }

        Ok(shortest)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Folder name of the repository root.
    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn kind(&self) -> TemplateKind {
        self.kind
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Whether the project name was derived or supplied rather than defaulted.
    pub fn has_valid_project_name(&self) -> bool {
        self.has_valid_project_name
    }

    /// Directory holding the primary solution, relative to the root.
    pub fn solution_root(&self) -> &'static str {
        self.kind.solution_root()
    }

    /// Interpolation variables for this repository.
    pub fn template(&self) -> PathTemplate<'_> {
        PathTemplate::new(&self.project_name, &self.slug)
    }

    /// Resolve a template-relative path into a repository-relative one.
    pub fn relative_path(&self, reference: &str) -> String {
        self.template().resolve_path(reference)
    }

    /// Absolute location of a repository-relative path.
    pub fn full_path(&self, relative: &str) -> PathBuf {
        NormalizedPath::new(&self.root).join(relative).to_native()
    }

    /// Resolve a template-relative path into `(relative, absolute)`.
    pub fn resolve(&self, reference: &str) -> (String, PathBuf) {
        let relative = self.relative_path(reference);
        let full = self.full_path(&relative);
        (relative, full)
    }

    /// Whether the ignore matcher excludes a repository-relative path.
    pub fn is_ignored(&self, relative: &str, is_dir: bool) -> bool {
        self.ignore.is_ignored(relative, is_dir)
    }

    /// Lazily enumerate files under `subdirectory` whose name matches `pattern`.
    ///
    /// Directories are visited breadth-first with entries in name order.
    /// `.git` and ignored entries are skipped and ignored directories are
    /// never entered. A missing subdirectory yields nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSubdirectory`] if `subdirectory` is absolute
    /// or climbs out of the repository.
    pub fn files(&self, subdirectory: &str, pattern: &FilePattern, search: Search) -> Result<Files<'_>> {
        let subdirectory = subdirectory.trim_end_matches(['/', '\\']);
        let escapes = Path::new(subdirectory)
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(Error::InvalidSubdirectory {
                path: subdirectory.to_string(),
            });
        }

        let start = if subdirectory.is_empty() {
            self.root.clone()
        } else {
            self.full_path(subdirectory)
        };

        let mut pending = VecDeque::new();
        if start.is_dir() {
            pending.push_back(start);
        }

        Ok(Files {
            repo: self,
            pattern: pattern.clone(),
            search,
            pending,
            ready: VecDeque::new(),
        })
    }

    /// Every non-ignored file in the repository.
    pub fn all_files(&self) -> Files<'_> {
        let mut pending = VecDeque::new();
        pending.push_back(self.root.clone());
        Files {
            repo: self,
            pattern: FilePattern::any(),
            search: Search::Recursive,
            pending,
            ready: VecDeque::new(),
        }
    }
}

/// How far enumeration descends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Search {
    TopLevel,
    Recursive,
}

/// A file found by enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoFile {
    pub full: PathBuf,
    /// Path relative to the repository root, forward slashes.
    pub relative: String,
}

impl RepoFile {
    pub fn file_name(&self) -> &str {
        self.relative.rsplit('/').next().unwrap_or(&self.relative)
    }
}

/// Lazy breadth-first file iterator returned by [`Repo::files`].
pub struct Files<'r> {
    repo: &'r Repo,
    pattern: FilePattern,
    search: Search,
    pending: VecDeque<PathBuf>,
    ready: VecDeque<RepoFile>,
}

impl Files<'_> {
    /// Read one directory, queueing matching files and subdirectories.
    fn expand(&mut self, directory: &Path) -> Result<()> {
        let mut entries = fs::read_dir(directory)
            .map_err(|e| prefect_fs::Error::io(directory, e))?
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(|e| prefect_fs::Error::io(directory, e))?;
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name == ".git" {
                continue;
            }

            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| prefect_fs::Error::io(&path, e))?;
            let is_dir = file_type.is_dir();
            let is_file = file_type.is_file() || (file_type.is_symlink() && path.is_file());

            let relative = prefect_fs::relative_to(&self.repo.root, &path)?;
            if self.repo.is_ignored(&relative, is_dir) {
                tracing::trace!(path = %relative, "skipping ignored entry");
                continue;
            }

            if is_dir {
                if self.search == Search::Recursive {
                    self.pending.push_back(path);
                }
            } else if is_file && self.pattern.matches(&name) {
                self.ready.push_back(RepoFile {
                    full: path,
                    relative,
                });
            }
        }

        Ok(())
    }
}

impl Iterator for Files<'_> {
    type Item = Result<RepoFile>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(file) = self.ready.pop_front() {
                return Some(Ok(file));
            }

            let directory = self.pending.pop_front()?;
            if let Err(e) = self.expand(&directory) {
                return Some(Err(e));
            }
        }
    }
}

/// A single path segment pattern: an exact name or one `*` wildcard.
///
/// Matching ignores ASCII case, as file names on the platforms these
/// repositories are developed on do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePattern {
    text: String,
    shape: Shape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Shape {
    Exact,
    /// `prefix*suffix`, either side possibly empty
    Wildcard { prefix: String, suffix: String },
}

impl FilePattern {
    /// Parse a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedPattern`] for `**`, path separators or
    /// more than one `*`.
    pub fn new(pattern: &str) -> Result<Self> {
        let unsupported = pattern.is_empty()
            || pattern.contains("**")
            || pattern.contains(['/', '\\'])
            || pattern.matches('*').count() > 1;
        if unsupported {
            return Err(Error::UnsupportedPattern {
                pattern: pattern.to_string(),
            });
        }

        let shape = match pattern.split_once('*') {
            Some((prefix, suffix)) => Shape::Wildcard {
                prefix: prefix.to_string(),
                suffix: suffix.to_string(),
            },
            None => Shape::Exact,
        };

        Ok(Self {
            text: pattern.to_string(),
            shape,
        })
    }

    /// The `*` pattern.
    pub fn any() -> Self {
        Self {
            text: "*".to_string(),
            shape: Shape::Wildcard {
                prefix: String::new(),
                suffix: String::new(),
            },
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn matches(&self, name: &str) -> bool {
        let name = name.as_bytes();
        match &self.shape {
            Shape::Exact => name.eq_ignore_ascii_case(self.text.as_bytes()),
            Shape::Wildcard { prefix, suffix } => {
                let (prefix, suffix) = (prefix.as_bytes(), suffix.as_bytes());
                name.len() >= prefix.len() + suffix.len()
                    && name[..prefix.len()].eq_ignore_ascii_case(prefix)
                    && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
            }
        }
    }
}

impl fmt::Display for FilePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
