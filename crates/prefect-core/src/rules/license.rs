//! License rules

use std::sync::LazyLock;

use prefect_fs::NormalizedPath;
use prefect_fs::{io, line_endings};
use regex::Regex;

use super::{Check, report};
use crate::Result;
use crate::repo::Repo;

const LICENSE_PATH: &str = "LICENSE";

const EXPECTED_ATTRIBUTION: &str = "Bonsai Foundation CIC and Contributors";

const STRICT_LICENSE: &str = "\
Copyright (c) Bonsai Foundation CIC and Contributors

Permission is hereby granted, free of charge, to any person obtaining a copy of
this software and associated documentation files (the \"Software\"), to deal in
the Software without restriction, including without limitation the rights to
use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies
of the Software, and to permit persons to whom the Software is furnished to do
so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.";

/// Separator permitted between the license and appended third-party notices.
const LICENSE_DIVIDER: &str =
    "\n\n-------------------------------------------------------------------------------\n\n";

/// MIT license text with line breaks flattened to spaces.
static MIT_LICENSE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = concat!(
        r"^((The MIT License \(MIT\)|MIT License)  )?",
        r"Copyright \([cC]\) (\d{4}(-\d{4})? )?(?<attribution>.+?) ",
        r" ",
        r#"Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files \(the "Software"\), to deal in "#,
        r"the Software without restriction, including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the ",
        r"Software, and to permit persons to whom the Software is furnished to do so, subject to the following conditions: ",
        r" ",
        r"The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software. ",
        r" ",
        r#"THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR "#,
        r"A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ",
        r"ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.",
        r"\s*?",
        r"(?<third_party>\s-{5,} .+)?",
        r"$",
    );
    Regex::new(pattern).expect("MIT license pattern is valid")
});

/// File names GitHub's license detection would pick up.
static LICENSE_FILE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(^|[-_.])((UN)?LICEN[SC]E|COPY(ING|RIGHT)|OFL|PATENTS)($|[-_.])")
        .expect("license file name pattern is valid")
});

/// How closely `LICENSE` must match the standard text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum EnforcementLevel {
    /// Any MIT license.
    MustBeMitLicense,
    /// MIT with the Bonsai Foundation attribution, any year or layout.
    MustBeBonsaiFoundation,
    /// The exact standard text, optionally followed by divided notices.
    #[default]
    StrictFormatting,
}

/// `LICENSE` in the root must be the project's MIT license.
///
/// There is no fixup: relicensing is never automatic.
#[derive(Debug, Clone, Default)]
pub struct MitLicenseRule {
    level: EnforcementLevel,
}

impl MitLicenseRule {
    pub fn new(level: EnforcementLevel) -> Self {
        Self { level }
    }

    pub fn level(&self) -> EnforcementLevel {
        self.level
    }
}

impl Check for MitLicenseRule {
    fn description(&self) -> String {
        format!("{LICENSE_PATH} contains the appropriate license")
    }

    fn validate(&self, repo: &Repo) -> Result<Option<String>> {
        let (relative, full) = repo.resolve(LICENSE_PATH);
        if !full.is_file() {
            return Ok(Some(format!("File '{relative}' must exist.")));
        }

        let content = io::read_text_lossy(&full)?;
        let problem = if self.level >= EnforcementLevel::StrictFormatting {
            check_strict(&content)
        } else {
            check_relaxed(&content, self.level)
        };

        Ok(problem.map(|problem| format!("License file '{relative}' {problem}")))
    }
}

fn check_strict(content: &str) -> Option<String> {
    let content = line_endings::normalize(content);
    let Some(remaining) = content.strip_prefix(STRICT_LICENSE) else {
        return Some("is not the correct license format.".to_string());
    };

    let problem = if remaining.is_empty() || remaining.starts_with(LICENSE_DIVIDER) {
        return None;
    } else if remaining.trim().is_empty() {
        "ends with extraneous whitespace."
    } else if remaining.trim_start().starts_with("--") {
        "seems to be followed by an additional license but the separator is incorrect."
    } else {
        "has additional text after the license without any sort of separation."
    };
    Some(problem.to_string())
}

fn check_relaxed(content: &str, level: EnforcementLevel) -> Option<String> {
    let flattened = line_endings::normalize(content).replace('\n', " ");
    let Some(captures) = MIT_LICENSE.captures(&flattened) else {
        return Some("does not appear to be an MIT license.".to_string());
    };

    if level >= EnforcementLevel::MustBeBonsaiFoundation {
        let attribution = captures.name("attribution").map_or("", |m| m.as_str());
        if attribution != EXPECTED_ATTRIBUTION {
            return Some(format!(
                "contains attribution to '{attribution}' rather than '{EXPECTED_ATTRIBUTION}'."
            ));
        }
    }

    None
}

/// The root `LICENSE` must be the only license file.
#[derive(Debug, Clone, Default)]
pub struct ExtraneousLicenseFilesRule;

impl Check for ExtraneousLicenseFilesRule {
    fn description(&self) -> String {
        "The only license file must be the LICENSE file in the root.".to_string()
    }

    fn validate(&self, repo: &Repo) -> Result<Option<String>> {
        let mut lines = Vec::new();

        for file in repo.all_files() {
            let file = file?;
            if file.relative == LICENSE_PATH || file.relative.starts_with("src/Externals/") {
                continue;
            }

            // Submodules keep their own license
            if file.file_name() == LICENSE_PATH
                && file.full.parent().is_some_and(|dir| dir.join(".git").exists())
            {
                continue;
            }

            let path = NormalizedPath::new(&file.relative);
            let stem = path.file_stem().unwrap_or_default().to_uppercase();
            if LICENSE_FILE_NAME.is_match(&stem) {
                lines.push(format!(
                    "'{}' appears to be a non-conformant license file.",
                    file.relative
                ));
            }
        }

        Ok(report(lines))
    }
}
