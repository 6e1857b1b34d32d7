use std::path::PathBuf;

use prefect_fs::line_endings::{self, LineEnding};
use prefect_fs::{NormalizedPath, io};

use super::Check;
use super::msbuild;
use crate::Result;
use crate::repo::Repo;

const EXPECTED: &str = r#"{
  "profiles": {
    "Bonsai": {
      "commandName": "Executable",
      "executablePath": "$(BonsaiExecutablePath)",
      "commandLineArgs": "--lib:\"$(TargetDir).\"",
      "nativeDebugging": true
    }
  }
}"#;

/// Each packable library project launches into Bonsai when debugged.
#[derive(Debug, Clone, Default)]
pub struct LaunchSettingsRule;

impl LaunchSettingsRule {
    /// `(relative, full)` launch settings path for every non-test, non-tool
    /// project.
    fn launch_settings_paths(&self, repo: &Repo) -> Result<Vec<(String, PathBuf)>> {
        let mut paths = Vec::new();

        for file in msbuild::project_files(repo)? {
            let file = file?;
            if file.relative.to_ascii_lowercase().ends_with(".tests.csproj") {
                continue;
            }

            // Tools have no launch profile
            let text = msbuild::read_lowercase(&file.full)?;
            let doc = msbuild::parse(&text, &file.relative)?;
            let pack_as_tool = msbuild::select(&doc, &["project", "propertygroup", "packastool"]).map(msbuild::text);
            if pack_as_tool.as_deref() == Some("true") {
                continue;
            }

            let directory = NormalizedPath::new(&file.relative)
                .parent()
                .unwrap_or_else(|| NormalizedPath::new(""));
            let relative = directory.join("Properties/launchSettings.json").to_string();
            let full = repo.full_path(&relative);
            paths.push((relative, full));
        }

        Ok(paths)
    }
}

impl Check for LaunchSettingsRule {
    fn description(&self) -> String {
        "All 'launchSettings.json' files have the expected content.".to_string()
    }

    fn validate(&self, repo: &Repo) -> Result<Option<String>> {
        let mut errors = String::new();

        for (relative, full) in self.launch_settings_paths(repo)? {
            if !full.is_file() {
                errors.push_str(&format!("\n    File '{relative}' must exist."));
            } else if line_endings::normalize(&io::read_text_lossy(&full)?) != EXPECTED {
                errors.push_str(&format!("\n    Contents of '{relative}' do not match the reference."));
            }
        }

        if errors.is_empty() {
            Ok(None)
        } else {
            Ok(Some(format!("Not all 'launchSettings.json' files are correct:{errors}")))
        }
    }

    fn fixup(&self, repo: &Repo) -> Result<bool> {
        let content = LineEnding::platform().apply(EXPECTED);
        for (relative, full) in self.launch_settings_paths(repo)? {
            io::write_text(&full, &content)?;
            tracing::info!(path = %relative, "wrote launch settings");
        }
        Ok(true)
    }
}
