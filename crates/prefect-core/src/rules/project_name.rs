use super::Check;
use crate::Result;
use crate::repo::Repo;

/// The project name must be derivable from the primary solution.
#[derive(Debug, Clone, Default)]
pub struct ProjectNameRule;

impl Check for ProjectNameRule {
    fn description(&self) -> String {
        "Repo should have friendly project name.".to_string()
    }

    fn validate(&self, repo: &Repo) -> Result<Option<String>> {
        if repo.has_valid_project_name() {
            Ok(None)
        } else {
            Ok(Some(
                "Could not determine the project name for the repo.".to_string(),
            ))
        }
    }
}
