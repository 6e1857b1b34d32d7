//! Reserved names inside a reference template.

use std::path::Path;

/// Prefix shared by every template control file.
///
/// Entries whose name starts with this marker configure the ruleset and never
/// produce rules of their own.
pub const CONTROL_MARKER: &str = ".prefect-";

/// Control files read from the reference template root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFile {
    /// Single line naming the template kind
    TemplateKind,
    /// Paths that must exist but whose content may diverge
    IgnoreContent,
    /// Paths whose content is interpolated before comparison
    InterpolatedFiles,
    /// Paths that must never exist in a target repository
    MustNotExist,
}

impl ControlFile {
    /// Get the file name of this control file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TemplateKind => ".prefect-template-kind",
            Self::IgnoreContent => ".prefect-ignore-content",
            Self::InterpolatedFiles => ".prefect-interpolated-files",
            Self::MustNotExist => ".prefect-must-not-exist",
        }
    }

    /// Check whether a template entry name is reserved for control files.
    pub fn is_control_name(name: &str) -> bool {
        name.starts_with(CONTROL_MARKER)
    }
}

impl AsRef<Path> for ControlFile {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl std::fmt::Display for ControlFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
