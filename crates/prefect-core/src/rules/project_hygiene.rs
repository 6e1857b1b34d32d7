//! C# project file hygiene
//!
//! Project files are folded to lowercase before parsing so every query is
//! case-insensitive, the way MSBuild itself treats property names.

use roxmltree::Document;

use super::msbuild;
use super::{Check, report};
use crate::Result;
use crate::repo::Repo;

/// Properties that belong in shared build infrastructure, not in projects.
const FORBIDDEN_PROPERTIES: &[&str] = &[
    "IsPackable",
    "ToolCommandName",
    "Configuration",
    "Platform",
    "GenerateResourceUsePreserializedResources",
    "EnableWindowsTargeting",
    "BonsaiExecutablePath",
    // Output
    "PackageOutputPath",
    "GeneratePackageOnBuild",
    "GenerateDocumentationFile",
    "UseArtifactsOutput",
    "ArtifactsPath",
    "IncludeSymbols",
    "SymbolPackageFormat",
    // Compiler
    "AllowUnsafeBlocks",
    "Features",
    "LangVersion",
    // Package and assembly metadata
    "Version",
    "VersionPrefix",
    "VersionSuffix",
    "PackageVersion",
    "FileVersion",
    "Authors",
    "Copyright",
    "PackageId",
    "PackageProjectUrl",
    "PackageLicenseFile",
    "PackageLicenseUrl",
    "PackageIcon",
    "PackageIconUrl",
    "PackageReadmeFile",
    "PackageRequireLicenseAcceptance",
    "RepositoryUrl",
    "RepositoryType",
    "PublishRepositoryUrl",
    "EmbedUntrackedSources",
    "PackageType",
    // Legacy project format
    "ProjectGuid",
    "RootNamespace",
];

/// Test projects are never packed, so they carry no package metadata at all.
const FORBIDDEN_TEST_PROPERTIES: &[&str] = &["Title", "Description", "PackageTags"];

const PERMITTED_FRAMEWORKS: &[&str] = &["net462", "net472", "netstandard2.0", "net8.0", "net8.0-windows"];

const PERMITTED_TEST_FRAMEWORKS: &[&str] = &["net472", "net8.0", "net8.0-windows"];

/// Projects that redistribute a third-party license.
const THIRD_PARTY_LICENSE_PROJECTS: &[&str] = &["Bonsai.TensorFlow.MoveNet", "Bonsai.Pylon"];

/// Validate every C# project against the shared build conventions.
#[derive(Debug, Clone, Default)]
pub struct ProjectHygieneRule;

impl Check for ProjectHygieneRule {
    fn description(&self) -> String {
        "Validate all C# projects.".to_string()
    }

    fn validate(&self, repo: &Repo) -> Result<Option<String>> {
        let mut lines = Vec::new();

        for file in msbuild::project_files(repo)? {
            let file = file?;
            let name = msbuild::file_stem(&file.relative);
            if name == "Extensions" {
                continue;
            }

            let text = msbuild::read_lowercase(&file.full)?;
            let doc = msbuild::parse(&text, &file.relative)?;
            let problems = project_problems(&doc, name);

            if !problems.is_empty() {
                lines.push(format!("'{}' contains problems:", file.relative));
                lines.extend(problems.into_iter().map(|problem| format!("    {problem}")));
            }
        }

        Ok(report(lines))
    }
}

/// Problems in one lowercased project document.
fn project_problems(doc: &Document<'_>, name: &str) -> Vec<String> {
    let is_test = name.ends_with(".Tests");
    let mut problems = Vec::new();

    let forbidden = FORBIDDEN_PROPERTIES
        .iter()
        .chain(is_test.then_some(FORBIDDEN_TEST_PROPERTIES).into_iter().flatten());
    for property in forbidden {
        let lowered = property.to_lowercase();
        let present = msbuild::elements(doc, "propertygroup")
            .any(|group| msbuild::child(group, &lowered).is_some());
        if present {
            problems.push(format!("Forbidden property '{property}'"));
        }
    }

    let root = doc.root_element();
    let is_project_root = root.tag_name().name() == "project";

    if is_project_root && msbuild::child(root, "import").is_some() {
        problems.push("Projects should not have explicit imports.".to_string());
    }

    let embeds = |needle: &str| {
        msbuild::elements(doc, "itemgroup").any(|group| {
            group
                .children()
                .filter(|item| item.is_element())
                .any(|item| item.attribute("include").is_some_and(|include| include.contains(needle)))
        })
    };

    if !THIRD_PARTY_LICENSE_PROJECTS.contains(&name) && embeds("license") {
        problems.push("Projects should not embed the license file explicitly".to_string());
    }
    if embeds("icon.png") {
        problems.push("Projects should not embed the icon file explicitly".to_string());
    }

    if msbuild::elements(doc, "project").any(|project| project.attribute("sdk") == Some("microsoft.net.sdk.windowsdesktop")) {
        problems.push("Projects should not use Microsoft.NET.Sdk.WindowsDesktop".to_string());
    }

    let frameworks = ["targetframework", "targetframeworks"].iter().find_map(|property| {
        msbuild::elements(doc, "project")
            .flat_map(|project| project.children())
            .filter(|group| group.is_element() && group.tag_name().name() == "propertygroup")
            .find_map(|group| msbuild::child(group, property))
    });

    match frameworks {
        None => problems.push("Projects must specify target framework(s).".to_string()),
        Some(element) => {
            let value = msbuild::text(element);
            for framework in value.split(';').map(str::trim).filter(|f| !f.is_empty()) {
                if !PERMITTED_FRAMEWORKS.contains(&framework) {
                    problems.push(format!("Target framework '{framework}' is not permitted."));
                } else if is_test && !PERMITTED_TEST_FRAMEWORKS.contains(&framework) {
                    problems.push(format!("Target framework '{framework}' is not permitted for tests."));
                }
            }
        }
    }

    problems
}
