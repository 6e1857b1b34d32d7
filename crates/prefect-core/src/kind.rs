//! Template kinds

use std::fmt;
use std::str::FromStr;

use prefect_fs::ControlFile;

use crate::Error;

/// Extension tag selecting built-in structural rules for a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateKind {
    /// Generic file and directory rules only
    #[default]
    None,
    /// Bonsai Foundation package repositories
    BonsaiFoundation,
    /// Harp device repositories, whose solution lives under `Interface/`
    HarpTech,
}

impl TemplateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::BonsaiFoundation => "BonsaiFoundation",
            Self::HarpTech => "HarpTech",
        }
    }

    /// Directory, relative to the repository root, holding the primary solution.
    pub fn solution_root(&self) -> &'static str {
        match self {
            Self::HarpTech => "Interface",
            Self::None | Self::BonsaiFoundation => "",
        }
    }
}

impl FromStr for TemplateKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "None" => Ok(Self::None),
            "BonsaiFoundation" => Ok(Self::BonsaiFoundation),
            "HarpTech" => Ok(Self::HarpTech),
            other => Err(Error::UnknownTemplateKind {
                file: ControlFile::TemplateKind.to_string(),
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
