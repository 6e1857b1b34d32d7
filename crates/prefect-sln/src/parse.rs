//! Line-oriented `.sln` reader

use std::iter::Enumerate;
use std::str::Lines;
use std::sync::LazyLock;

use prefect_fs::line_endings::{self, LineEnding};
use prefect_fs::path::normalize_separators;
use regex::{Captures, Regex};
use uuid::Uuid;

use crate::model::{ConfigMapping, Entry, Folder, GlobalSection, Project, Solution, SolutionConfiguration};
use crate::types;
use crate::{Error, Result};

static PROJECT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^Project\("(?P<type>[^"]*)"\)\s*=\s*"(?P<name>[^"]*)"\s*,\s*"(?P<path>[^"]*)"\s*,\s*"(?P<id>[^"]*)"\s*$"#,
    )
    .expect("Invalid project line regex")
});

static SECTION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:Project|Global)Section\((?P<name>[^)]*)\)\s*=\s*(?P<phase>\S+)\s*$")
        .expect("Invalid section line regex")
});

impl Solution {
    /// Parse the text of a solution file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] for unterminated blocks or unreadable
    /// configuration lines and [`Error::InvalidGuid`] for bad identifiers.
    pub fn parse(text: &str) -> Result<Self> {
        let (bom, text) = match text.strip_prefix('\u{feff}') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let line_ending = line_endings::detect(text.as_bytes()).unwrap_or(LineEnding::CrLf);

        let mut solution = Solution::empty(bom, line_ending);
        let mut reader = Reader {
            lines: text.lines().enumerate(),
        };
        let mut nesting = Vec::new();
        let mut in_body = false;

        while let Some((number, raw)) = reader.next_line() {
            let line = raw.trim();
            if let Some(captures) = PROJECT_LINE.captures(line) {
                in_body = true;
                let entry = reader.project(number, &captures)?;
                solution.entries.push(entry);
            } else if line == "Global" {
                in_body = true;
                reader.global(number, &mut solution, &mut nesting)?;
            } else if !in_body {
                solution.header.push(raw.to_string());
            } else if !line.is_empty() {
                tracing::debug!(line = number, text = line, "ignoring stray solution line");
            }
        }

        for (child, parent) in nesting {
            if !solution.move_to_folder(child, Some(parent)) {
                tracing::debug!(%child, "nested entry is not part of the solution");
            }
        }

        Ok(solution)
    }
}

struct Reader<'a> {
    lines: Enumerate<Lines<'a>>,
}

impl<'a> Reader<'a> {
    /// Next line with its 1-based number.
    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        self.lines.next().map(|(index, line)| (index + 1, line))
    }

    fn project(&mut self, start: usize, captures: &Captures<'_>) -> Result<Entry> {
        let type_id = parse_guid(&captures["type"])?;
        let name = captures["name"].to_string();
        let path = normalize_separators(&captures["path"]);
        let id = parse_guid(&captures["id"])?;

        let mut files = Vec::new();
        let mut sections = Vec::new();

        loop {
            let Some((number, raw)) = self.next_line() else {
                return Err(Error::malformed(start, "Project without EndProject"));
            };
            let line = raw.trim();

            if line == "EndProject" {
                break;
            }

            match SECTION_LINE.captures(line) {
                Some(section) if &section["name"] == "SolutionItems" => {
                    for (_, item) in self.section_body(number, "EndProjectSection")? {
                        let item = item.trim();
                        let key = item.split_once('=').map_or(item, |(key, _)| key.trim());
                        files.push(normalize_separators(key));
                    }
                }
                Some(_) => {
                    sections.push(raw.to_string());
                    for (_, body) in self.section_body(number, "EndProjectSection")? {
                        sections.push(body.to_string());
                    }
                    sections.push(raw.replace(line, "EndProjectSection"));
                }
                None if line.is_empty() => {}
                None => sections.push(raw.to_string()),
            }
        }

        if type_id == types::SOLUTION_FOLDER {
            Ok(Entry::Folder(Folder::new(id, name, files, sections)))
        } else {
            Ok(Entry::Project(Project {
                type_id,
                name,
                path,
                id,
                parent: None,
                sections,
            }))
        }
    }

    fn global(
        &mut self,
        start: usize,
        solution: &mut Solution,
        nesting: &mut Vec<(Uuid, Uuid)>,
    ) -> Result<()> {
        loop {
            let Some((number, raw)) = self.next_line() else {
                return Err(Error::malformed(start, "Global without EndGlobal"));
            };
            let line = raw.trim();

            if line == "EndGlobal" {
                return Ok(());
            }

            let Some(section) = SECTION_LINE.captures(line) else {
                continue;
            };
            let name = section["name"].to_string();
            let phase = section["phase"].to_string();
            let body = self.section_body(number, "EndGlobalSection")?;

            match name.as_str() {
                "SolutionConfigurationPlatforms" => {
                    for (number, item) in body {
                        let key = item.split_once('=').map_or(item, |(key, _)| key);
                        let configuration = SolutionConfiguration::parse(key.trim())
                            .ok_or_else(|| Error::malformed(number, "expected Configuration|Platform"))?;
                        solution.configurations.push(configuration);
                    }
                }
                "ProjectConfigurationPlatforms" => {
                    for (number, item) in body {
                        solution.mappings.push(parse_mapping(number, item.trim())?);
                    }
                }
                "NestedProjects" => {
                    for (number, item) in body {
                        let (child, parent) = item
                            .split_once('=')
                            .ok_or_else(|| Error::malformed(number, "expected {child} = {parent}"))?;
                        nesting.push((parse_guid(child)?, parse_guid(parent)?));
                    }
                }
                _ => solution.globals.push(GlobalSection {
                    name,
                    phase,
                    lines: body.into_iter().map(|(_, l)| l.trim().to_string()).collect(),
                }),
            }
        }
    }

    /// Non-blank lines up to (not including) the `end` marker.
    fn section_body(&mut self, start: usize, end: &str) -> Result<Vec<(usize, &'a str)>> {
        let mut body = Vec::new();
        loop {
            let Some((number, raw)) = self.next_line() else {
                return Err(Error::malformed(start, format!("section without {end}")));
            };
            let line = raw.trim();
            if line == end {
                return Ok(body);
            }
            if !line.is_empty() {
                body.push((number, raw));
            }
        }
    }
}

fn parse_guid(text: &str) -> Result<Uuid> {
    let text = text.trim();
    Uuid::parse_str(text).map_err(|_| Error::InvalidGuid {
        value: text.to_string(),
    })
}

/// `{id}.Debug|Any CPU.ActiveCfg = Debug|Any CPU`
fn parse_mapping(number: usize, line: &str) -> Result<ConfigMapping> {
    let malformed = || Error::malformed(number, "expected {project}.Configuration|Platform.Dimension = Value");

    let (key, value) = line.split_once('=').ok_or_else(malformed)?;
    let (project, rest) = key.trim().split_once('.').ok_or_else(malformed)?;
    let bar = rest.find('|').ok_or_else(malformed)?;
    let dot = rest[bar..].find('.').map(|offset| bar + offset).ok_or_else(malformed)?;
    let configuration = SolutionConfiguration::parse(&rest[..dot]).ok_or_else(malformed)?;

    Ok(ConfigMapping {
        project: parse_guid(project)?,
        configuration,
        dimension: rest[dot + 1..].to_string(),
        value: value.trim().to_string(),
    })
}
