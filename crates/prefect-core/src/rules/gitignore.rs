//! `.gitignore` hygiene for .NET repositories

use prefect_fs::io;
use prefect_fs::line_endings::{self, LineEnding};

use super::Check;
use crate::Result;
use crate::repo::Repo;

const GITIGNORE_PATH: &str = ".gitignore";

/// Patterns every repository must ignore, in file order.
const REQUIRED_PATTERNS: &[&str] = &[
    "**/.bonsai/Bonsai.exe*",
    "**/.bonsai/Packages/",
    "**/.bonsai/Settings/",
    ".vs/",
    "/artifacts/",
];

const FORBIDDEN_PATTERNS: &[&str] = &[
    "packages",
    "Packages",
    "bin",
    "bin/",
    "obj",
    "obj/",
    ".suo",
    ".vs",
    "_site",
    "_site/",
    ".nuget",
    ".nuget/",
    "Debug",
    "Release",
    // Overly generic
    "*.exe",
    "*.dll",
    "*.exe.settings",
    "*.exe.*",
    // Missing the leading `**/`
    ".bonsai/Settings/",
    ".bonsai/Packages/",
    ".bonsai/Bonsai.exe*",
];

fn is_required(pattern: &str) -> bool {
    REQUIRED_PATTERNS.contains(&pattern)
}

fn is_forbidden(pattern: &str) -> bool {
    FORBIDDEN_PATTERNS.contains(&pattern)
}

/// `.gitignore` carries the modern required patterns and none of the legacy
/// ones.
#[derive(Debug, Clone, Default)]
pub struct GitignoreRule;

impl Check for GitignoreRule {
    fn description(&self) -> String {
        format!("'{GITIGNORE_PATH}' meets the standards for modern .NET projects")
    }

    fn validate(&self, repo: &Repo) -> Result<Option<String>> {
        let (relative, full) = repo.resolve(GITIGNORE_PATH);
        if !full.is_file() {
            return Ok(Some(format!("File '{relative}' must exist.")));
        }

        let content = io::read_text_lossy(&full)?;
        let mut errors = String::new();
        let mut missing = REQUIRED_PATTERNS.to_vec();

        for line in content.lines() {
            let pattern = line.trim();
            missing.retain(|required| *required != pattern);
            if is_forbidden(pattern) {
                errors.push_str(&format!("\n    Pattern '{pattern}' is legacy and should be removed."));
            }
        }

        for pattern in missing {
            errors.push_str(&format!("\n    Pattern '{pattern}' was expected but not found."));
        }

        if errors.is_empty() {
            Ok(None)
        } else {
            Ok(Some(format!(
                "'{relative}' does not meet the standard for modern .NET projects:{errors}"
            )))
        }
    }

    fn fixup(&self, repo: &Repo) -> Result<bool> {
        let (relative, full) = repo.resolve(GITIGNORE_PATH);
        let existing = if full.is_file() {
            io::read_text_lossy(&full)?
        } else {
            String::new()
        };

        let line_ending = line_endings::detect(existing.as_bytes()).unwrap_or_else(LineEnding::platform);
        let content = rewrite(&existing, line_ending.as_str());
        io::write_text(&full, &content)?;
        tracing::info!(path = %relative, "rewrote .gitignore with required patterns");
        Ok(true)
    }
}

/// Required patterns first, then the surviving existing lines.
///
/// The existing lines are separated from the required block only when the
/// file already had more than one section.
fn rewrite(existing: &str, eol: &str) -> String {
    let lines: Vec<&str> = existing.lines().collect();
    let mut output = String::with_capacity(existing.len() + 128);

    for pattern in REQUIRED_PATTERNS {
        output.push_str(pattern);
        output.push_str(eol);
    }

    let mut want_separator = lines
        .iter()
        .position(|line| line.is_empty())
        .is_some_and(|index| index + 1 < lines.len());
    let mut last_was_blank = false;

    for line in lines {
        let trimmed = line.trim();
        if is_required(trimmed) || is_forbidden(trimmed) {
            continue;
        }

        if want_separator {
            output.push_str(eol);
            last_was_blank = true;
            want_separator = false;
        }

        if last_was_blank && trimmed.is_empty() {
            continue;
        }

        output.push_str(line);
        output.push_str(eol);
        last_was_blank = trimmed.is_empty();
    }

    output
}
