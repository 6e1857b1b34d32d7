use prefect_fs::NormalizedPath;

use super::msbuild;
use super::{Check, report};
use crate::Result;
use crate::repo::Repo;

const MSBUILD_EXTENSIONS: &[&str] = &["props", "targets", "csproj"];

/// MSBuild files carry none of the boilerplate SDK-style projects no longer
/// need.
#[derive(Debug, Clone, Default)]
pub struct BuildNoiseRule;

impl Check for BuildNoiseRule {
    fn description(&self) -> String {
        "Build infrastructure does not contain any unnecessary noise.".to_string()
    }

    fn validate(&self, repo: &Repo) -> Result<Option<String>> {
        let mut lines = Vec::new();

        for file in repo.all_files() {
            let file = file?;
            let path = NormalizedPath::new(&file.relative);
            let is_msbuild = path
                .extension()
                .is_some_and(|ext| MSBUILD_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)));
            if !is_msbuild || path.is_under("artifacts") {
                continue;
            }

            let text = msbuild::read(&file.full)?;
            lines.extend(noise(&text, &file.relative)?);
        }

        Ok(report(lines))
    }
}

fn noise(text: &str, relative: &str) -> Result<Vec<String>> {
    let doc = msbuild::parse(text, relative)?;
    let mut lines = Vec::new();

    if text.trim_start().starts_with("<?xml") {
        lines.push(format!("'{relative}' contains an XML declaration."));
    }

    let root = doc.root_element();
    if root.tag_name().name() != "Project" {
        lines.push(format!("'{relative}' does not seem to be an MSBuild file."));
        return Ok(lines);
    }

    for attribute in root.attributes() {
        if attribute.name().eq_ignore_ascii_case("ToolsVersion") {
            lines.push(format!("'{relative}' contains legacy attribute '{}'", attribute.name()));
        }
    }

    if root.namespaces().any(|ns| ns.name().is_none()) {
        lines.push(format!("'{relative}' contains legacy attribute 'xmlns'"));
    }

    Ok(lines)
}
