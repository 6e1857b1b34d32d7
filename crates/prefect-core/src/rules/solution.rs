//! Solution file rules
//!
//! The primary solution must list exactly the projects in the repository and
//! mirror the `build/` directory as solution folders. Reconciliation is a
//! pure function over the parsed model so validation and fixup share it.

use std::collections::BTreeMap;
use std::path::PathBuf;

use prefect_fs::NormalizedPath;
use prefect_sln::{Solution, types};

use super::Check;
use crate::Result;
use crate::repo::{FilePattern, Repo, Search};

/// At most one solution file in the repository root.
#[derive(Debug, Clone, Default)]
pub struct OnlyOneSolutionRule;

impl Check for OnlyOneSolutionRule {
    fn description(&self) -> String {
        "Only one solution should be present in the root.".to_string()
    }

    fn validate(&self, repo: &Repo) -> Result<Option<String>> {
        let pattern = FilePattern::new("*.sln")?;
        let found = repo
            .files("", &pattern, Search::TopLevel)?
            .take(2)
            .collect::<Result<Vec<_>>>()?;

        if found.len() > 1 {
            Ok(Some("Multiple solution files are present in the root.".to_string()))
        } else {
            Ok(None)
        }
    }
}

/// The outcome of reconciling a solution against the repository.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// The solution with every correction applied.
    pub solution: Solution,
    pub problems: Vec<String>,
    /// A problem the corrected model cannot be trusted to fix.
    pub fatal: bool,
}

impl Reconciliation {
    fn problem(&mut self, message: String) {
        self.problems.push(message);
    }

    fn fatal_problem(&mut self, message: String) {
        self.problems.push(message);
        self.fatal = true;
    }
}

/// Compare `solution` with the repository and correct it in memory.
///
/// Paths in the solution are relative to the solution directory.
pub fn reconcile_solution(repo: &Repo, solution: Solution) -> Result<Reconciliation> {
    let mut result = Reconciliation {
        solution,
        problems: Vec::new(),
        fatal: false,
    };
    let root = repo.solution_root();

    reconcile_projects(repo, root, &mut result)?;
    reconcile_folders(repo, root, &mut result)?;

    if result.solution.remove_platform("Mixed Platforms") {
        result.problem("'Mixed Platforms' platform is not permitted.".to_string());
    }

    Ok(result)
}

/// Path of a repository file relative to the solution directory.
fn solution_relative<'a>(root: &str, relative: &'a str) -> &'a str {
    if root.is_empty() {
        relative
    } else {
        relative
            .strip_prefix(root)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(relative)
    }
}

fn reconcile_projects(repo: &Repo, root: &str, result: &mut Reconciliation) -> Result<()> {
    // Keyed by file name, which must be unique across the repository
    let mut expected: BTreeMap<String, String> = BTreeMap::new();
    for pattern in ["*.csproj", "*.vcxproj"] {
        for file in repo.files(root, &FilePattern::new(pattern)?, Search::Recursive)? {
            let file = file?;
            let name = file.file_name().to_string();
            if expected.contains_key(&name) {
                result.fatal_problem(format!("Repo contains more than one project named '{name}'"));
                continue;
            }
            expected.insert(name, solution_relative(root, &file.relative).to_string());
        }
    }

    let existing: Vec<_> = result
        .solution
        .projects()
        .map(|project| (project.id, project.path.clone(), project.parent, project.type_id))
        .collect();

    for (id, path, parent, type_id) in existing {
        let name = NormalizedPath::new(&path).file_name().unwrap_or_default().to_string();
        let Some(expected_path) = expected.remove(&name) else {
            result.problem(format!("Project '{path}' points to a non-existent project!"));
            result.solution.remove_project(id);
            continue;
        };

        let mut path = path;
        if path != expected_path {
            result.problem(format!("Project '{path}' exists but points to an outdated location."));
            if let Some(project) = result.solution.project_mut(id) {
                project.path = expected_path.clone();
            }
            path = expected_path;
        }

        if parent.is_some() {
            result.problem(format!("Project '{path}' is nested under a solution folder."));
            result.solution.move_to_folder(id, None);
        }

        if type_id == types::CSHARP_LEGACY {
            result.problem(format!("Project '{path}' is using a legacy C# project GUID"));
            if let Some(project) = result.solution.project_mut(id) {
                project.type_id = types::CSHARP;
            }
        }
    }

    for path in expected.into_values() {
        result.problem(format!("'{path}' is not present."));
        result.solution.add_project(&path)?;
    }

    Ok(())
}

/// Solution folders that mirror `build/`, with the files each must list.
///
/// Every ancestor of a populated folder is expected too, so `/build/` exists
/// even when only its subdirectories hold files.
fn expected_folders(repo: &Repo, root: &str) -> Result<BTreeMap<String, Vec<String>>> {
    let build = NormalizedPath::new(root).join("build");
    let mut folders: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for file in repo.files(build.as_str(), &FilePattern::any(), Search::Recursive)? {
        let file = file?;
        let relative = solution_relative(root, &file.relative).to_string();
        let directory = match relative.rsplit_once('/') {
            Some((directory, _)) => directory.to_string(),
            None => continue,
        };

        let mut ancestor = String::new();
        for segment in directory.split('/') {
            ancestor.push('/');
            ancestor.push_str(segment);
            folders.entry(format!("{ancestor}/")).or_default();
        }
        folders.entry(format!("/{directory}/")).or_default().push(relative);
    }

    Ok(folders)
}

fn reconcile_folders(repo: &Repo, root: &str, result: &mut Reconciliation) -> Result<()> {
    let mut expected = expected_folders(repo, root)?;

    let existing: Vec<_> = result
        .solution
        .folders()
        .map(|folder| (folder.id, folder.name.clone(), result.solution.folder_path(folder.id)))
        .collect();

    for (id, name, path) in existing {
        let Some(path) = path else {
            tracing::warn!(folder = %name, "solution folder is nested under a non-folder entry");
            result.problem(format!(
                "Solution folder '{name}' is nested under an entry that is not a solution folder"
            ));
            result.solution.remove_folder(id);
            continue;
        };

        let Some(files) = expected.remove(&path) else {
            result.problem(format!("Solution folder '{path}' should not exist"));
            result.solution.remove_folder(id);
            continue;
        };

        let Some(folder) = result.solution.folder_mut(id) else {
            continue;
        };
        let mut removed = folder.take_files();
        for file in &files {
            folder.add_file(file);
        }

        let mut messages = Vec::new();
        for file in files {
            match removed.iter().position(|listed| *listed == file) {
                Some(index) => {
                    removed.remove(index);
                }
                None => messages.push(format!("File '{file}' is missing.")),
            }
        }
        messages.extend(removed.into_iter().map(|file| format!("File '{file}' should not be present.")));

        for message in messages {
            result.problem(message);
        }
    }

    for (path, files) in expected {
        result.problem(format!("'{path}' is missing."));
        let id = result.solution.add_folder(&path)?;
        if let Some(folder) = result.solution.folder_mut(id) {
            for file in &files {
                folder.add_file(file);
            }
        }
    }

    Ok(())
}

/// The primary solution reflects the projects and build files on disk.
#[derive(Debug, Clone, Default)]
pub struct SolutionStructureRule;

/// What the rule found before deciding whether to save.
enum Outcome {
    Invalid(String),
    Checked {
        relative: String,
        full: PathBuf,
        reconciliation: Reconciliation,
    },
}

impl SolutionStructureRule {
    fn check(&self, repo: &Repo) -> Result<Outcome> {
        if !repo.has_valid_project_name() {
            return Ok(Outcome::Invalid(
                "Repo must have solution in root that we can identify as primary.".to_string(),
            ));
        }

        let relative = NormalizedPath::new(repo.solution_root())
            .join(&format!("{}.sln", repo.project_name()))
            .to_string();
        let full = repo.full_path(&relative);
        if !full.is_file() {
            return Ok(Outcome::Invalid(format!("Could not open solution '{relative}'")));
        }

        let solution = Solution::load(&full)?;
        let reconciliation = reconcile_solution(repo, solution)?;
        Ok(Outcome::Checked {
            relative,
            full,
            reconciliation,
        })
    }
}

impl Check for SolutionStructureRule {
    fn description(&self) -> String {
        "Solution reflects the contents of the repository.".to_string()
    }

    fn validate(&self, repo: &Repo) -> Result<Option<String>> {
        Ok(match self.check(repo)? {
            Outcome::Invalid(message) => Some(message),
            Outcome::Checked {
                relative,
                reconciliation,
                ..
            } => {
                if reconciliation.problems.is_empty() {
                    None
                } else {
                    let mut message = format!("{relative} has problems:");
                    for problem in &reconciliation.problems {
                        message.push_str("\n  ");
                        message.push_str(problem);
                    }
                    Some(message)
                }
            }
        })
    }

    fn fixup(&self, repo: &Repo) -> Result<bool> {
        let Outcome::Checked {
            relative,
            full,
            reconciliation,
        } = self.check(repo)?
        else {
            return Ok(false);
        };

        if reconciliation.problems.is_empty() || reconciliation.fatal {
            return Ok(false);
        }

        reconciliation.solution.save(&full)?;
        tracing::info!(path = %relative, problems = reconciliation.problems.len(), "reconciled solution");
        Ok(true)
    }
}
