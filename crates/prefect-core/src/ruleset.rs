//! Compiling a reference template into rules

use std::collections::HashSet;
use std::path::Path;

use prefect_fs::{ControlFile, FileIndex, io};
use walkdir::WalkDir;

use crate::kind::TemplateKind;
use crate::repo::Repo;
use crate::rules::{
    BuildNoiseRule, Check, DirectoryRule, ExtraneousLicenseFilesRule, FileContentRule, FileDoesNotExistRule,
    FileExistsRule, FileGlobDoesNotExistRule, GitignoreRule, InterpolatedFileContentRule, LaunchSettingsRule,
    MitLicenseRule, OnlyOneSolutionRule, PackageMetadataRule, ProjectHygieneRule, ProjectNameRule,
    ProjectsInSrcRule, Rule, SolutionStructureRule, SubmoduleRule,
};
use crate::{Error, Result};

/// Repository slugs licensed under something other than MIT.
const ALTERNATE_LICENSE_SLUGS: &[&str] = &["tld", "cmt"];

/// An ordered, immutable list of rules plus the template kind they were
/// compiled for.
#[derive(Debug, Clone)]
pub struct Ruleset {
    kind: TemplateKind,
    rules: Vec<Rule>,
}

impl Ruleset {
    /// Compile the reference template at `template_root`.
    ///
    /// Rules come out in a fixed order: the project name rule, the built-in
    /// rules of the template kind, one rule per must-not-exist entry, then
    /// one rule per template entry in name order.
    ///
    /// # Errors
    ///
    /// Returns an error for a missing template, an unknown template kind, an
    /// unreadable control file or an unreadable reference file.
    pub fn load(template_root: &Path) -> Result<Self> {
        if !template_root.is_dir() {
            return Err(Error::TemplateNotFound {
                path: template_root.to_path_buf(),
            });
        }

        let kind = read_kind(template_root)?;
        let mut rules = vec![Rule::ProjectName(ProjectNameRule)];
        rules.extend(kind_rules(kind)?);

        let must_not_exist = FileIndex::load(&template_root.join(ControlFile::MustNotExist))?;
        rules.extend(
            must_not_exist
                .iter()
                .map(|path| Rule::FileDoesNotExist(FileDoesNotExistRule::new(path))),
        );

        let ignore_content = index_set(template_root, ControlFile::IgnoreContent)?;
        let interpolated = index_set(template_root, ControlFile::InterpolatedFiles)?;

        let walker = WalkDir::new(template_root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let name = entry.file_name().to_string_lossy();
                name != ".git" && !ControlFile::is_control_name(&name)
            });

        for entry in walker {
            let entry = entry?;
            let relative = prefect_fs::relative_to(template_root, entry.path())?;
            let reference = entry.path().to_path_buf();

            let rule = if entry.file_type().is_dir() {
                Rule::Directory(DirectoryRule::new(relative))
            } else if entry.metadata()?.len() == 0 {
                Rule::FileExists(FileExistsRule::new(relative, Some(reference)))
            } else {
                let ignored = ignore_content.contains(&relative);
                let dynamic = interpolated.contains(&relative);
                match (ignored, dynamic) {
                    (true, true) => Rule::InterpolatedContent(
                        InterpolatedFileContentRule::new(relative, &reference)?.always_overwrite(false),
                    ),
                    (true, false) => Rule::FileExists(FileExistsRule::new(relative, Some(reference))),
                    (false, true) => Rule::InterpolatedContent(InterpolatedFileContentRule::new(relative, &reference)?),
                    (false, false) => Rule::FileContent(FileContentRule::new(relative, reference)?),
                }
            };

            tracing::debug!(rule = %rule.description(), "compiled template rule");
            rules.push(rule);
        }

        tracing::debug!(kind = %kind, rules = rules.len(), "compiled ruleset");
        Ok(Self { kind, rules })
    }

    /// Assemble a ruleset from already-built rules.
    pub fn from_rules(kind: TemplateKind, rules: Vec<Rule>) -> Self {
        Self { kind, rules }
    }

    pub fn kind(&self) -> TemplateKind {
        self.kind
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Kind-specific exemptions for one repository.
    pub fn should_skip(&self, rule: &Rule, repo: &Repo) -> bool {
        match self.kind {
            TemplateKind::BonsaiFoundation => {
                matches!(rule, Rule::MitLicense(_)) && ALTERNATE_LICENSE_SLUGS.contains(&repo.slug())
            }
            TemplateKind::None | TemplateKind::HarpTech => false,
        }
    }
}

impl<'a> IntoIterator for &'a Ruleset {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

fn read_kind(template_root: &Path) -> Result<TemplateKind> {
    let path = template_root.join(ControlFile::TemplateKind);
    if !path.is_file() {
        return Ok(TemplateKind::None);
    }
    io::read_text(&path)?.parse()
}

fn index_set(template_root: &Path, file: ControlFile) -> Result<HashSet<String>> {
    let index = FileIndex::load(&template_root.join(file))?;
    Ok(index.iter().map(str::to_string).collect())
}

/// Built-in rules for a template kind, in evaluation order.
fn kind_rules(kind: TemplateKind) -> Result<Vec<Rule>> {
    match kind {
        TemplateKind::BonsaiFoundation => bonsai_foundation_rules(),
        TemplateKind::None | TemplateKind::HarpTech => Ok(Vec::new()),
    }
}

fn bonsai_foundation_rules() -> Result<Vec<Rule>> {
    Ok(vec![
        Rule::MitLicense(MitLicenseRule::default()),
        Rule::PackageMetadata(PackageMetadataRule),
        Rule::ProjectsInSrc(ProjectsInSrcRule),
        Rule::ProjectHygiene(ProjectHygieneRule),
        Rule::BuildNoise(BuildNoiseRule),
        Rule::Gitignore(GitignoreRule),
        Rule::LaunchSettings(LaunchSettingsRule),
        Rule::ExtraneousLicenses(ExtraneousLicenseFilesRule),
        Rule::Submodules(SubmoduleRule::default()),
        Rule::OnlyOneSolution(OnlyOneSolutionRule),
        Rule::SolutionStructure(SolutionStructureRule),
        Rule::GlobDoesNotExist(FileGlobDoesNotExistRule::new(".hgignore")?),
        // Legacy C++ package
        Rule::GlobDoesNotExist(
            FileGlobDoesNotExistRule::new("*.nuspec")?.with_exception(|repo, _| repo.project_name() == "Bonsai.Tld"),
        ),
        Rule::GlobDoesNotExist(FileGlobDoesNotExistRule::new("NuGet.exe")?),
        Rule::GlobDoesNotExist(FileGlobDoesNotExistRule::new("NuGet.targets")?),
        // Bonsai environments carry their own package sources
        Rule::GlobDoesNotExist(
            FileGlobDoesNotExistRule::new("NuGet.config")?
                .with_exception(|_, path| path.to_ascii_lowercase().ends_with("bonsai/nuget.config")),
        ),
        Rule::GlobDoesNotExist(
            FileGlobDoesNotExistRule::under(".github/workflows/", "*.yml")?
                .with_exception(|repo, path| path == format!(".github/workflows/{}.yml", repo.project_name())),
        ),
    ])
}
