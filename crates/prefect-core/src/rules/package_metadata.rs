use super::msbuild;
use super::{Check, report};
use crate::Result;
use crate::repo::Repo;

const PACKAGE_PROPS: &str = "build/Package.props";
const COPYRIGHT: &str = "Copyright © Bonsai Foundation CIC and Contributors";

/// NuGet package metadata is set globally and extended, not replaced, by
/// each project.
#[derive(Debug, Clone, Default)]
pub struct PackageMetadataRule;

impl Check for PackageMetadataRule {
    fn description(&self) -> String {
        "NuGet Package metadata is correct.".to_string()
    }

    fn validate(&self, repo: &Repo) -> Result<Option<String>> {
        let mut lines = Vec::new();

        let full = repo.full_path(PACKAGE_PROPS);
        if full.is_file() {
            let text = msbuild::read(&full)?;
            let doc = msbuild::parse(&text, PACKAGE_PROPS)?;

            let expected_url = format!("https://bonsai-rx.org/{}", repo.slug());
            if msbuild::property(&doc, "PackageProjectUrl").as_deref() != Some(expected_url.as_str()) {
                lines.push(format!("'{PACKAGE_PROPS}': PackageProjectUrl should be '{expected_url}'"));
            }
            if msbuild::property(&doc, "Copyright").as_deref() != Some(COPYRIGHT) {
                lines.push(format!("'{PACKAGE_PROPS}': Copyright should be '{COPYRIGHT}'"));
            }
        } else {
            lines.push(format!("'{PACKAGE_PROPS}' does not exist."));
        }

        for file in msbuild::project_files(repo)? {
            let file = file?;
            if msbuild::file_stem(&file.relative).ends_with(".Tests") {
                continue;
            }

            let text = msbuild::read(&file.full)?;
            let doc = msbuild::parse(&text, &file.relative)?;
            let relative = &file.relative;

            let prefix = if msbuild::property(&doc, "PackAsTool").as_deref() == Some("true") {
                "Bonsai "
            } else {
                "Bonsai - "
            };

            // Bonsai.ML titles its packages its own way
            if repo.project_name() != "Bonsai.ML"
                && !msbuild::property(&doc, "Title").is_some_and(|title| title.starts_with(prefix))
            {
                lines.push(format!(
                    "'{relative}': Title should be in the form of '{prefix}Project Name'"
                ));
            }

            if msbuild::property(&doc, "Description").is_none_or(|description| description.is_empty()) {
                lines.push(format!("'{relative}': The package should have a description."));
            }

            if msbuild::property(&doc, "PackageTags").is_some_and(|tags| !tags.starts_with("$(PackageTags) ")) {
                lines.push(format!(
                    "'{relative}': Projects should only add package tags, not replace them."
                ));
            }
        }

        Ok(report(lines))
    }
}
