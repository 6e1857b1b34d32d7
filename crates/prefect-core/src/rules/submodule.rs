//! `.gitmodules` validation

use prefect_fs::io;

use super::{Check, report};
use crate::Result;
use crate::repo::Repo;

const GITMODULES_PATH: &str = ".gitmodules";

const SECTION_PREFIX: &str = "[submodule \"";
const SECTION_SUFFIX: &str = "\"]";

/// A submodule every repository must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredSubmodule {
    /// `owner/name` on GitHub, lowercase.
    pub slug: &'static str,
    pub path: &'static str,
    pub revision: Option<&'static str>,
}

const REQUIRED_SUBMODULES: &[RequiredSubmodule] = &[RequiredSubmodule {
    slug: "bonsai-rx/docfx-tools",
    path: "docs/bonsai-docfx",
    revision: Some("5b584cadc5f1e3088f4972469243df2e3faf6925"),
}];

const FORBIDDEN_SUBMODULES: &[&str] = &["bonsai-rx/docfx-assets"];

#[derive(Debug, Clone, PartialEq, Eq)]
struct Submodule {
    name: String,
    path: String,
    /// Normalized: no `.git` suffix, no trailing slash, lowercase.
    url: String,
}

/// Submodules point at HTTPS GitHub URLs, required ones are present at the
/// pinned revision, and forbidden ones are absent.
#[derive(Debug, Clone)]
pub struct SubmoduleRule {
    required: Vec<RequiredSubmodule>,
    forbidden: Vec<&'static str>,
}

impl Default for SubmoduleRule {
    fn default() -> Self {
        Self {
            required: REQUIRED_SUBMODULES.to_vec(),
            forbidden: FORBIDDEN_SUBMODULES.to_vec(),
        }
    }
}

impl SubmoduleRule {
    pub fn new(required: Vec<RequiredSubmodule>, forbidden: Vec<&'static str>) -> Self {
        Self { required, forbidden }
    }
}

impl Check for SubmoduleRule {
    fn description(&self) -> String {
        "Verify submodule usage".to_string()
    }

    fn validate(&self, repo: &Repo) -> Result<Option<String>> {
        let mut lines = Vec::new();

        let full = repo.full_path(GITMODULES_PATH);
        let submodules = if full.is_file() {
            parse_gitmodules(&io::read_text(&full)?, &mut lines)
        } else {
            Vec::new()
        };

        let mut missing: Vec<&RequiredSubmodule> = self.required.iter().collect();

        for submodule in &submodules {
            if self.forbidden.iter().any(|slug| submodule.url.contains(slug)) {
                lines.push(format!(
                    "Git submodule '{}' at '{}' is not permitted.",
                    submodule.name, submodule.path
                ));
                continue;
            }

            let Some(required) = self.required.iter().find(|r| submodule.url.contains(r.slug)) else {
                continue;
            };
            missing.retain(|r| r.slug != required.slug);

            if submodule.path != required.path {
                lines.push(format!(
                    "Git submodule '{}' at '{}' is expected to be at '{}'",
                    submodule.name, submodule.path, required.path
                ));
            }

            let Some(expected) = required.revision else {
                continue;
            };
            match prefect_git::revision::checked_out_revision(&repo.full_path(&submodule.path))? {
                Some(actual) if actual != expected => lines.push(format!(
                    "Git submodule '{}' points to Git revision '{actual}' rather than the expected '{expected}' (submodule is likely out-of-date)",
                    submodule.name
                )),
                Some(_) => {}
                None => lines.push(format!(
                    "Git submodule '{}' @ '{}' does not appear to be checked out, ensure submodules are up-to-date.",
                    submodule.name, submodule.path
                )),
            }
        }

        for required in missing {
            let mut line = format!(
                "Expected to find submodule at '{}' pointed to {}",
                required.path, required.slug
            );
            if let Some(revision) = required.revision {
                line.push_str(&format!(" @ {revision}"));
            }
            lines.push(line);
        }

        Ok(report(lines))
    }
}

/// Parse the subset of `.gitmodules` git itself writes.
///
/// Problems are appended to `errors`; every complete entry is returned.
fn parse_gitmodules(text: &str, errors: &mut Vec<String>) -> Vec<Submodule> {
    let mut submodules = Vec::new();
    let mut name: Option<String> = None;
    let mut path: Option<String> = None;
    let mut url: Option<String> = None;

    // The extra empty line flushes the final entry
    for (index, line) in text.lines().chain(std::iter::once("")).enumerate() {
        let line_number = index + 1;
        let line = line.trim();

        if let (Some(_), Some(_), Some(_)) = (&name, &path, &url) {
            submodules.push(Submodule {
                name: name.take().unwrap_or_default(),
                path: path.take().unwrap_or_default(),
                url: url.take().unwrap_or_default(),
            });
        }

        if let Some(section) = line
            .strip_prefix(SECTION_PREFIX)
            .and_then(|rest| rest.strip_suffix(SECTION_SUFFIX))
        {
            if name.is_some() || path.is_some() || url.is_some() {
                errors.push(format!(
                    "{GITMODULES_PATH}:{line_number} starts a new submodule but we didn't finish parsing the last one!"
                ));
            }
            name = Some(section.to_string());
            path = None;
            url = None;
            continue;
        }

        if let Some(value) = line.strip_prefix("path = ") {
            path = Some(value.to_string());
            continue;
        }

        if let Some(value) = line.strip_prefix("url = ") {
            if !value.starts_with("https://github.com/") {
                errors.push(format!(
                    "{GITMODULES_PATH}:{line_number} '{value}' is not an HTTPS GitHub URL"
                ));
            }
            let value = value.strip_suffix(".git").unwrap_or(value);
            let value = value.strip_suffix('/').unwrap_or(value);
            url = Some(value.to_lowercase());
            continue;
        }

        if line.is_empty() || line.starts_with("branch = ") {
            continue;
        }

        errors.push(format!(
            "Not sure how to parse '{line}' from '{GITMODULES_PATH}' @ line {line_number}"
        ));
    }

    if name.is_some() || path.is_some() || url.is_some() {
        errors.push(
            "Finished reading submodules file but we never finished parsing the last entry!".to_string(),
        );
    }

    submodules
}
