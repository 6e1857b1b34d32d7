use prefect_fs::NormalizedPath;

use super::msbuild;
use super::{Check, report};
use crate::Result;
use crate::repo::Repo;

/// Every `.csproj` lives under `src/`.
///
/// Test projects may live under `tests/` instead, and `Extensions.csproj`
/// (the Bonsai environment extensions project) may live anywhere.
#[derive(Debug, Clone, Default)]
pub struct ProjectsInSrcRule;

impl Check for ProjectsInSrcRule {
    fn description(&self) -> String {
        "All csproj files are contained within the src directory".to_string()
    }

    fn validate(&self, repo: &Repo) -> Result<Option<String>> {
        let mut lines = Vec::new();

        for file in msbuild::project_files(repo)? {
            let file = file?;
            let path = NormalizedPath::new(&file.relative);

            if file.relative.ends_with(".Tests.csproj") && path.is_under("tests") {
                continue;
            }
            if file.file_name() == "Extensions.csproj" {
                continue;
            }

            if !path.is_under("src") {
                lines.push(format!("'{}' is not within the 'src' directory.", file.relative));
            }
        }

        Ok(report(lines))
    }
}
