//! The rule family
//!
//! Every rule answers two questions about a [`Repo`]: does it conform
//! ([`Check::validate`]), and can the nonconformance be repaired
//! ([`Check::fixup`]). The set of rule kinds is closed, so [`Rule`] is a plain
//! enum dispatching to one struct per kind.

mod build_noise;
mod file;
mod gitignore;
mod glob;
mod launch_settings;
mod license;
mod msbuild;
mod package_metadata;
mod project_hygiene;
mod project_name;
mod projects_in_src;
mod solution;
mod submodule;

pub use build_noise::BuildNoiseRule;
pub use file::{DirectoryRule, FileContentRule, FileDoesNotExistRule, FileExistsRule, InterpolatedFileContentRule};
pub use gitignore::GitignoreRule;
pub use glob::{FileGlobDoesNotExistRule, GlobException};
pub use launch_settings::LaunchSettingsRule;
pub use license::{EnforcementLevel, ExtraneousLicenseFilesRule, MitLicenseRule};
pub use package_metadata::PackageMetadataRule;
pub use project_hygiene::ProjectHygieneRule;
pub use project_name::ProjectNameRule;
pub use projects_in_src::ProjectsInSrcRule;
pub use solution::{OnlyOneSolutionRule, Reconciliation, SolutionStructureRule, reconcile_solution};
pub use submodule::SubmoduleRule;

use crate::Result;
use crate::repo::Repo;

/// The validate/fixup contract shared by every rule.
pub trait Check {
    /// Human-readable statement of what the rule enforces.
    fn description(&self) -> String;

    /// Returns the reason the repository fails this rule, or `None`.
    ///
    /// Must not modify the repository.
    fn validate(&self, repo: &Repo) -> Result<Option<String>>;

    /// Attempt to repair a violation. Returns `true` if a fix was applied.
    ///
    /// Applying a fixup to a conformant repository must be harmless.
    fn fixup(&self, _repo: &Repo) -> Result<bool> {
        Ok(false)
    }
}

/// A compiled conformance rule.
#[derive(Debug, Clone)]
pub enum Rule {
    ProjectName(ProjectNameRule),
    Directory(DirectoryRule),
    FileExists(FileExistsRule),
    FileContent(FileContentRule),
    InterpolatedContent(InterpolatedFileContentRule),
    FileDoesNotExist(FileDoesNotExistRule),
    GlobDoesNotExist(FileGlobDoesNotExistRule),
    MitLicense(MitLicenseRule),
    PackageMetadata(PackageMetadataRule),
    ProjectsInSrc(ProjectsInSrcRule),
    ProjectHygiene(ProjectHygieneRule),
    BuildNoise(BuildNoiseRule),
    Gitignore(GitignoreRule),
    LaunchSettings(LaunchSettingsRule),
    ExtraneousLicenses(ExtraneousLicenseFilesRule),
    Submodules(SubmoduleRule),
    OnlyOneSolution(OnlyOneSolutionRule),
    SolutionStructure(SolutionStructureRule),
}

macro_rules! dispatch {
    ($rule:expr, $inner:ident => $body:expr) => {
        match $rule {
            Rule::ProjectName($inner) => $body,
            Rule::Directory($inner) => $body,
            Rule::FileExists($inner) => $body,
            Rule::FileContent($inner) => $body,
            Rule::InterpolatedContent($inner) => $body,
            Rule::FileDoesNotExist($inner) => $body,
            Rule::GlobDoesNotExist($inner) => $body,
            Rule::MitLicense($inner) => $body,
            Rule::PackageMetadata($inner) => $body,
            Rule::ProjectsInSrc($inner) => $body,
            Rule::ProjectHygiene($inner) => $body,
            Rule::BuildNoise($inner) => $body,
            Rule::Gitignore($inner) => $body,
            Rule::LaunchSettings($inner) => $body,
            Rule::ExtraneousLicenses($inner) => $body,
            Rule::Submodules($inner) => $body,
            Rule::OnlyOneSolution($inner) => $body,
            Rule::SolutionStructure($inner) => $body,
        }
    };
}

impl Check for Rule {
    fn description(&self) -> String {
        dispatch!(self, rule => rule.description())
    }

    fn validate(&self, repo: &Repo) -> Result<Option<String>> {
        dispatch!(self, rule => rule.validate(repo))
    }

    fn fixup(&self, repo: &Repo) -> Result<bool> {
        dispatch!(self, rule => rule.fixup(repo))
    }
}

/// Join collected problem lines into one failure message.
pub(crate) fn report(lines: Vec<String>) -> Option<String> {
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}
