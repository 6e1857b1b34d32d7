//! In-memory solution model

use std::fmt;
use std::path::Path;

use prefect_fs::LineEnding;
use prefect_fs::path::{NormalizedPath, normalize_separators};
use uuid::Uuid;

use crate::types;
use crate::{Error, Result};

/// A buildable project referenced by the solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub type_id: Uuid,
    pub name: String,
    /// Location relative to the solution directory, forward slashes.
    pub path: String,
    pub id: Uuid,
    /// Solution folder the project is nested under.
    pub parent: Option<Uuid>,
    pub(crate) sections: Vec<String>,
}

/// A virtual solution folder and the loose files it lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub id: Uuid,
    pub name: String,
    pub parent: Option<Uuid>,
    files: Vec<String>,
    pub(crate) sections: Vec<String>,
}

impl Folder {
    pub(crate) fn new(id: Uuid, name: String, files: Vec<String>, sections: Vec<String>) -> Self {
        Self {
            id,
            name,
            parent: None,
            files,
            sections,
        }
    }

    /// Member files, relative to the solution directory with forward slashes.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Add a member file. Returns `false` if it was already listed.
    pub fn add_file(&mut self, file: &str) -> bool {
        let file = normalize_separators(file);
        if self.files.contains(&file) {
            return false;
        }
        self.files.push(file);
        true
    }

    /// Remove a member file. Returns `false` if it was not listed.
    pub fn remove_file(&mut self, file: &str) -> bool {
        let file = normalize_separators(file);
        let before = self.files.len();
        self.files.retain(|existing| *existing != file);
        self.files.len() != before
    }

    /// Remove every member file, returning what was listed.
    pub fn take_files(&mut self) -> Vec<String> {
        std::mem::take(&mut self.files)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Entry {
    Project(Project),
    Folder(Folder),
}

impl Entry {
    pub(crate) fn id(&self) -> Uuid {
        match self {
            Self::Project(project) => project.id,
            Self::Folder(folder) => folder.id,
        }
    }

    pub(crate) fn parent(&self) -> Option<Uuid> {
        match self {
            Self::Project(project) => project.parent,
            Self::Folder(folder) => folder.parent,
        }
    }

    fn set_parent(&mut self, parent: Option<Uuid>) {
        match self {
            Self::Project(project) => project.parent = parent,
            Self::Folder(folder) => folder.parent = parent,
        }
    }
}

/// A solution-level build configuration such as `Debug|Any CPU`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SolutionConfiguration {
    pub build_type: String,
    pub platform: String,
}

impl SolutionConfiguration {
    pub fn new(build_type: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            build_type: build_type.into(),
            platform: platform.into(),
        }
    }

    /// Parse the `BuildType|Platform` form.
    pub fn parse(text: &str) -> Option<Self> {
        let (build_type, platform) = text.split_once('|')?;
        Some(Self::new(build_type.trim(), platform.trim()))
    }
}

impl fmt::Display for SolutionConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.build_type, self.platform)
    }
}

/// One line of the project configuration table.
///
/// `dimension` is `ActiveCfg`, `Build.0` or `Deploy.0`; `value` is the
/// project-side configuration the solution configuration maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigMapping {
    pub project: Uuid,
    pub configuration: SolutionConfiguration,
    pub dimension: String,
    pub value: String,
}

/// A global section carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GlobalSection {
    pub(crate) name: String,
    pub(crate) phase: String,
    pub(crate) lines: Vec<String>,
}

/// A parsed `.sln` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub(crate) bom: bool,
    pub(crate) line_ending: LineEnding,
    pub(crate) header: Vec<String>,
    pub(crate) entries: Vec<Entry>,
    pub(crate) configurations: Vec<SolutionConfiguration>,
    pub(crate) mappings: Vec<ConfigMapping>,
    pub(crate) globals: Vec<GlobalSection>,
}

impl Default for Solution {
    fn default() -> Self {
        Self::new()
    }
}

impl Solution {
    /// An empty solution with the current Visual Studio header and the usual
    /// `Debug`/`Release` configurations.
    pub fn new() -> Self {
        Self {
            bom: true,
            line_ending: LineEnding::CrLf,
            header: [
                "",
                "Microsoft Visual Studio Solution File, Format Version 12.00",
                "# Visual Studio Version 17",
                "VisualStudioVersion = 17.0.31903.59",
                "MinimumVisualStudioVersion = 10.0.40219.1",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            entries: Vec::new(),
            configurations: vec![
                SolutionConfiguration::new("Debug", "Any CPU"),
                SolutionConfiguration::new("Release", "Any CPU"),
            ],
            mappings: Vec::new(),
            globals: vec![GlobalSection {
                name: "SolutionProperties".to_string(),
                phase: "preSolution".to_string(),
                lines: vec!["HideSolutionNode = FALSE".to_string()],
            }],
        }
    }

    pub(crate) fn empty(bom: bool, line_ending: LineEnding) -> Self {
        Self {
            bom,
            line_ending,
            header: Vec::new(),
            entries: Vec::new(),
            configurations: Vec::new(),
            mappings: Vec::new(),
            globals: Vec::new(),
        }
    }

    /// Read and parse a solution file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = prefect_fs::io::read_text(path)?;
        Self::parse(&text)
    }

    /// Serialize the solution and replace `path` atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        prefect_fs::io::write_text(path, &self.to_string())?;
        tracing::info!(path = %path.display(), "saved solution");
        Ok(())
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn configurations(&self) -> &[SolutionConfiguration] {
        &self.configurations
    }

    pub fn mappings(&self) -> &[ConfigMapping] {
        &self.mappings
    }

    /// Projects in file order, folders excluded.
    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Project(project) => Some(project),
            Entry::Folder(_) => None,
        })
    }

    pub fn project(&self, id: Uuid) -> Option<&Project> {
        self.projects().find(|project| project.id == id)
    }

    pub fn project_mut(&mut self, id: Uuid) -> Option<&mut Project> {
        self.entries.iter_mut().find_map(|entry| match entry {
            Entry::Project(project) if project.id == id => Some(project),
            _ => None,
        })
    }

    /// Add a project file, mapping it into every solution configuration.
    ///
    /// The project type follows from the file extension.
    pub fn add_project(&mut self, path: &str) -> Result<Uuid> {
        let normalized = NormalizedPath::new(path);
        let type_id = normalized
            .extension()
            .and_then(types::for_extension)
            .ok_or_else(|| Error::UnknownProjectType {
                path: path.to_string(),
            })?;
        let name = normalized.file_stem().unwrap_or_default().to_string();

        let id = Uuid::new_v4();
        for configuration in &self.configurations {
            let platform = project_platform(type_id, &configuration.platform);
            let value = format!("{}|{}", configuration.build_type, platform);
            for dimension in ["ActiveCfg", "Build.0"] {
                self.mappings.push(ConfigMapping {
                    project: id,
                    configuration: configuration.clone(),
                    dimension: dimension.to_string(),
                    value: value.clone(),
                });
            }
        }

        self.entries.push(Entry::Project(Project {
            type_id,
            name,
            path: normalized.as_str().to_string(),
            id,
            parent: None,
            sections: Vec::new(),
        }));
        Ok(id)
    }

    /// Remove a project and its configuration mappings.
    pub fn remove_project(&mut self, id: Uuid) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|entry| !matches!(entry, Entry::Project(project) if project.id == id));
        if self.entries.len() == before {
            return false;
        }
        self.mappings.retain(|mapping| mapping.project != id);
        true
    }

    /// Nest a project or folder under `parent`, or move it to the top level.
    pub fn move_to_folder(&mut self, id: Uuid, parent: Option<Uuid>) -> bool {
        match self.entries.iter_mut().find(|entry| entry.id() == id) {
            Some(entry) => {
                entry.set_parent(parent);
                true
            }
            None => false,
        }
    }

    /// Solution folders in file order.
    pub fn folders(&self) -> impl Iterator<Item = &Folder> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Folder(folder) => Some(folder),
            Entry::Project(_) => None,
        })
    }

    pub fn folder_mut(&mut self, id: Uuid) -> Option<&mut Folder> {
        self.entries.iter_mut().find_map(|entry| match entry {
            Entry::Folder(folder) if folder.id == id => Some(folder),
            _ => None,
        })
    }

    /// Virtual path of a folder, `/outer/inner/`, derived from its ancestry.
    pub fn folder_path(&self, id: Uuid) -> Option<String> {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(folder_id) = current {
            // Nesting cycles are cut off once every folder has been visited
            if names.len() > self.entries.len() {
                break;
            }
            let folder = self.folders().find(|folder| folder.id == folder_id)?;
            names.push(folder.name.as_str());
            current = folder.parent;
        }
        names.reverse();
        Some(format!("/{}/", names.join("/")))
    }

    /// Find a folder by virtual path.
    pub fn find_folder(&self, path: &str) -> Option<Uuid> {
        self.folders()
            .map(|folder| folder.id)
            .find(|&id| self.folder_path(id).as_deref() == Some(path))
    }

    /// Add the folder at virtual path `/a/b/`, creating missing ancestors.
    ///
    /// Returns the id of the innermost folder, existing or new.
    pub fn add_folder(&mut self, path: &str) -> Result<Uuid> {
        let segments = folder_segments(path)?;

        let mut parent = None;
        for segment in segments {
            let existing = self
                .folders()
                .find(|folder| folder.parent == parent && folder.name == segment)
                .map(|folder| folder.id);

            parent = Some(match existing {
                Some(id) => id,
                None => {
                    let mut folder =
                        Folder::new(Uuid::new_v4(), segment.to_string(), Vec::new(), Vec::new());
                    folder.parent = parent;
                    let id = folder.id;
                    self.entries.push(Entry::Folder(folder));
                    id
                }
            });
        }

        parent.ok_or_else(|| Error::InvalidFolderPath {
            path: path.to_string(),
        })
    }

    /// Remove a folder. Anything nested inside moves up to its parent.
    pub fn remove_folder(&mut self, id: Uuid) -> bool {
        let Some(position) = self
            .entries
            .iter()
            .position(|entry| matches!(entry, Entry::Folder(folder) if folder.id == id))
        else {
            return false;
        };

        let removed = self.entries.remove(position);
        let grandparent = removed.parent();
        for entry in &mut self.entries {
            if entry.parent() == Some(id) {
                entry.set_parent(grandparent);
            }
        }
        true
    }

    /// Drop a solution platform together with every mapping that uses it.
    ///
    /// Returns `true` if anything referenced the platform.
    pub fn remove_platform(&mut self, platform: &str) -> bool {
        let configurations = self.configurations.len();
        let mappings = self.mappings.len();

        self.configurations.retain(|c| c.platform != platform);
        self.mappings
            .retain(|mapping| mapping.configuration.platform != platform);

        self.configurations.len() != configurations || self.mappings.len() != mappings
    }
}

/// Project-side platform for a solution platform.
fn project_platform(type_id: Uuid, solution_platform: &str) -> &str {
    if type_id == types::CPP {
        match solution_platform {
            "x86" => "Win32",
            "Any CPU" => "x64",
            other => other,
        }
    } else {
        "Any CPU"
    }
}

fn folder_segments(path: &str) -> Result<Vec<&str>> {
    let invalid = || Error::InvalidFolderPath {
        path: path.to_string(),
    };
    let inner = path
        .strip_prefix('/')
        .and_then(|rest| rest.strip_suffix('/'))
        .ok_or_else(invalid)?;
    let segments: Vec<&str> = inner.split('/').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(invalid());
    }
    Ok(segments)
}
