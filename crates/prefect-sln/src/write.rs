//! `.sln` serialization

use std::fmt;

use crate::model::{Entry, Solution};
use crate::types::{self, format_guid};

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines: Vec<String> = self.header.clone();

        for entry in &self.entries {
            match entry {
                Entry::Project(project) => {
                    lines.push(project_line(
                        &project.type_id,
                        &project.name,
                        &project.path.replace('/', "\\"),
                        &project.id,
                    ));
                    lines.extend(project.sections.iter().cloned());
                }
                Entry::Folder(folder) => {
                    lines.push(project_line(
                        &types::SOLUTION_FOLDER,
                        &folder.name,
                        &folder.name,
                        &folder.id,
                    ));
                    if !folder.files().is_empty() {
                        lines.push("\tProjectSection(SolutionItems) = preProject".to_string());
                        for file in folder.files() {
                            let file = file.replace('/', "\\");
                            lines.push(format!("\t\t{file} = {file}"));
                        }
                        lines.push("\tEndProjectSection".to_string());
                    }
                    lines.extend(folder.sections.iter().cloned());
                }
            }
            lines.push("EndProject".to_string());
        }

        lines.push("Global".to_string());

        if !self.configurations.is_empty() {
            let body = self
                .configurations
                .iter()
                .map(|configuration| format!("{configuration} = {configuration}"));
            push_section(&mut lines, "SolutionConfigurationPlatforms", "preSolution", body);
        }

        if !self.mappings.is_empty() {
            let body = self.mappings.iter().map(|mapping| {
                format!(
                    "{}.{}.{} = {}",
                    format_guid(&mapping.project),
                    mapping.configuration,
                    mapping.dimension,
                    mapping.value
                )
            });
            push_section(&mut lines, "ProjectConfigurationPlatforms", "postSolution", body);
        }

        let nested: Vec<String> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let parent = entry.parent()?;
                Some(format!("{} = {}", format_guid(&entry.id()), format_guid(&parent)))
            })
            .collect();
        let has_properties = self.globals.iter().any(|g| g.name == "SolutionProperties");
        let push_nested = |lines: &mut Vec<String>| {
            if !nested.is_empty() {
                push_section(lines, "NestedProjects", "preSolution", nested.iter().cloned());
            }
        };

        if !has_properties {
            push_nested(&mut lines);
        }
        for global in &self.globals {
            push_section(&mut lines, &global.name, &global.phase, global.lines.iter().cloned());
            if global.name == "SolutionProperties" {
                push_nested(&mut lines);
            }
        }

        lines.push("EndGlobal".to_string());

        if self.bom {
            f.write_str("\u{feff}")?;
        }
        let eol = self.line_ending.as_str();
        for line in &lines {
            f.write_str(line)?;
            f.write_str(eol)?;
        }
        Ok(())
    }
}

fn project_line(type_id: &uuid::Uuid, name: &str, path: &str, id: &uuid::Uuid) -> String {
    format!(
        "Project(\"{}\") = \"{name}\", \"{path}\", \"{}\"",
        format_guid(type_id),
        format_guid(id)
    )
}

fn push_section(
    lines: &mut Vec<String>,
    name: &str,
    phase: &str,
    body: impl Iterator<Item = String>,
) {
    lines.push(format!("\tGlobalSection({name}) = {phase}"));
    lines.extend(body.map(|line| format!("\t\t{line}")));
    lines.push("\tEndGlobalSection".to_string());
}
