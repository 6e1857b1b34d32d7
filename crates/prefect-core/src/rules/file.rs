//! Generic file and directory rules generated from the reference template

use std::path::{Path, PathBuf};

use prefect_fs::checksum::{Digest256, file_digest};
use prefect_fs::line_endings::{self, LineEnding};
use prefect_fs::io;

use super::Check;
use crate::Result;
use crate::repo::Repo;
use crate::template::uses_project_name;

/// A path naming the project cannot be fixed until the project name is known.
fn fixup_blocked(repo: &Repo, reference: &str) -> bool {
    !repo.has_valid_project_name() && uses_project_name(reference)
}

/// Directory must exist; fixup creates it.
#[derive(Debug, Clone)]
pub struct DirectoryRule {
    path: String,
}

impl DirectoryRule {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Check for DirectoryRule {
    fn description(&self) -> String {
        format!("Directory '{}' exists", self.path)
    }

    fn validate(&self, repo: &Repo) -> Result<Option<String>> {
        let (relative, full) = repo.resolve(&self.path);
        if full.is_dir() {
            Ok(None)
        } else {
            Ok(Some(format!("Directory '{relative}' not found.")))
        }
    }

    fn fixup(&self, repo: &Repo) -> Result<bool> {
        if fixup_blocked(repo, &self.path) {
            return Ok(false);
        }

        let (relative, full) = repo.resolve(&self.path);
        io::create_dir_all(&full)?;
        tracing::info!(path = %relative, "created directory");
        Ok(true)
    }
}

/// File must exist; fixup copies the reference file only when the target
/// is absent.
///
/// Zero-length reference files are placeholders for content only the
/// repository can provide, so they have no fixup.
#[derive(Debug, Clone)]
pub struct FileExistsRule {
    path: String,
    reference: Option<PathBuf>,
}

impl FileExistsRule {
    pub fn new(path: impl Into<String>, reference: Option<PathBuf>) -> Self {
        Self {
            path: path.into(),
            reference,
        }
    }
}

impl Check for FileExistsRule {
    fn description(&self) -> String {
        format!("File '{}' exists", self.path)
    }

    fn validate(&self, repo: &Repo) -> Result<Option<String>> {
        let (relative, full) = repo.resolve(&self.path);
        Ok(must_exist(&relative, &full))
    }

    fn fixup(&self, repo: &Repo) -> Result<bool> {
        if fixup_blocked(repo, &self.path) {
            return Ok(false);
        }

        let Some(reference) = &self.reference else {
            return Ok(false);
        };

        let (relative, full) = repo.resolve(&self.path);
        if full.exists() {
            return Ok(false);
        }

        let content = io::read_bytes(reference)?;
        if content.is_empty() {
            return Ok(false);
        }

        io::write_atomic(&full, &content)?;
        tracing::info!(path = %relative, "copied reference file");
        Ok(true)
    }
}

fn must_exist(relative: &str, full: &Path) -> Option<String> {
    if full.is_file() {
        None
    } else {
        Some(format!("File '{relative}' must exist."))
    }
}

/// File must be byte-identical to the reference; fixup always overwrites.
#[derive(Debug, Clone)]
pub struct FileContentRule {
    path: String,
    reference: PathBuf,
    expected: Digest256,
}

impl FileContentRule {
    /// Hash the reference file once, up front.
    pub fn new(path: impl Into<String>, reference: PathBuf) -> Result<Self> {
        let expected = file_digest(&reference)?;
        Ok(Self {
            path: path.into(),
            reference,
            expected,
        })
    }
}

impl Check for FileContentRule {
    fn description(&self) -> String {
        format!("File '{}' has expected contents", self.path)
    }

    fn validate(&self, repo: &Repo) -> Result<Option<String>> {
        let (relative, full) = repo.resolve(&self.path);
        if let Some(missing) = must_exist(&relative, &full) {
            return Ok(Some(missing));
        }

        if file_digest(&full)? == self.expected {
            Ok(None)
        } else {
            Ok(Some(format!(
                "Contents of '{relative}' do not match the reference."
            )))
        }
    }

    fn fixup(&self, repo: &Repo) -> Result<bool> {
        if fixup_blocked(repo, &self.path) {
            return Ok(false);
        }

        let (relative, full) = repo.resolve(&self.path);
        let content = io::read_bytes(&self.reference)?;
        io::write_atomic(&full, &content)?;
        tracing::info!(path = %relative, "overwrote file with reference content");
        Ok(true)
    }
}

/// File content is the reference after `$NAME$` interpolation.
///
/// With `always_overwrite` off the rule only requires the file to exist and
/// the reference to interpolate cleanly, and its fixup only creates missing
/// files.
#[derive(Debug, Clone)]
pub struct InterpolatedFileContentRule {
    path: String,
    template: String,
    always_overwrite: bool,
}

impl InterpolatedFileContentRule {
    /// Read the reference template, normalized to LF line endings.
    pub fn new(path: impl Into<String>, reference: &Path) -> Result<Self> {
        let template = line_endings::normalize(&io::read_text(reference)?);
        Ok(Self::with_template(path, template))
    }

    pub fn with_template(path: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            template: template.into(),
            always_overwrite: true,
        }
    }

    pub fn always_overwrite(mut self, always_overwrite: bool) -> Self {
        self.always_overwrite = always_overwrite;
        self
    }

    /// Interpolate the template, or list every unknown variable it uses.
    fn expected_content(&self, repo: &Repo) -> std::result::Result<String, Vec<String>> {
        let mut errors = Vec::new();
        let content = repo.template().interpolate(&self.template, |name| {
            errors.push(format!(
                "Template '{}' contains unknown variable '{name}'",
                self.path
            ));
            name.to_string()
        });

        if errors.is_empty() {
            Ok(content)
        } else {
            Err(errors)
        }
    }
}

impl Check for InterpolatedFileContentRule {
    fn description(&self) -> String {
        format!("File '{}' has expected dynamic contents", self.path)
    }

    fn validate(&self, repo: &Repo) -> Result<Option<String>> {
        let (relative, full) = repo.resolve(&self.path);
        if let Some(missing) = must_exist(&relative, &full) {
            return Ok(Some(missing));
        }

        let expected = match self.expected_content(repo) {
            Ok(expected) => expected,
            Err(mut errors) => {
                errors.push(format!(
                    "Cannot verify '{relative}' due to errors in reference template."
                ));
                return Ok(Some(errors.join("\n")));
            }
        };

        if !self.always_overwrite {
            return Ok(None);
        }

        let actual = line_endings::normalize(&io::read_text_lossy(&full)?);
        if actual == expected {
            Ok(None)
        } else {
            Ok(Some(format!(
                "Contents of '{relative}' do not match the reference."
            )))
        }
    }

    fn fixup(&self, repo: &Repo) -> Result<bool> {
        if fixup_blocked(repo, &self.path) {
            return Ok(false);
        }

        let (relative, full) = repo.resolve(&self.path);
        let exists = full.is_file();
        if exists && !self.always_overwrite {
            return Ok(false);
        }

        let Ok(content) = self.expected_content(repo) else {
            return Ok(false);
        };

        let line_ending = if exists {
            line_endings::detect(&io::read_bytes(&full)?).unwrap_or_else(LineEnding::platform)
        } else {
            LineEnding::platform()
        };

        io::write_text(&full, &line_ending.apply(&content))?;
        tracing::info!(path = %relative, ?line_ending, "wrote interpolated file");
        Ok(true)
    }
}

/// File must not exist. Removal is left to the operator.
#[derive(Debug, Clone)]
pub struct FileDoesNotExistRule {
    path: String,
}

impl FileDoesNotExistRule {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Check for FileDoesNotExistRule {
    fn description(&self) -> String {
        format!("File '{}' does not exist", self.path)
    }

    fn validate(&self, repo: &Repo) -> Result<Option<String>> {
        let (relative, full) = repo.resolve(&self.path);
        if full.is_file() {
            Ok(Some(format!("File '{relative}' must not exist.")))
        } else {
            Ok(None)
        }
    }
}
