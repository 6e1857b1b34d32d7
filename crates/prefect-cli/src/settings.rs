//! Run settings from an optional settings file merged with CLI flags

use std::path::Path;

use prefect_core::ReconcileOptions;
use prefect_fs::ConfigStore;
use serde::Deserialize;

use crate::cli::Cli;
use crate::error::Result;

/// Settings a `--config` file may provide.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub auto_fix: bool,
    pub interactive: bool,
    pub max_fixup_rounds: usize,
    /// Repository folder names to leave alone
    pub skip: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_fix: false,
            interactive: false,
            max_fixup_rounds: ReconcileOptions::default().max_fixup_rounds,
            skip: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings, picking the format from the file extension.
    pub fn load(path: &Path) -> Result<Self> {
        let settings = ConfigStore::new().load(path)?;
        tracing::debug!(path = %path.display(), ?settings, "loaded settings");
        Ok(settings)
    }

    /// Settings from `--config` (if any) with the command-line flags on top.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let base = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(base.merge(cli))
    }

    /// Flags switch options on; skips are appended.
    pub fn merge(mut self, cli: &Cli) -> Self {
        self.auto_fix |= cli.auto_fix;
        self.interactive |= cli.interactive;
        for name in &cli.skip {
            if !self.skip.contains(name) {
                self.skip.push(name.clone());
            }
        }
        self
    }

    pub fn reconcile_options(&self, project_name: Option<String>) -> ReconcileOptions {
        ReconcileOptions {
            auto_fix: self.auto_fix,
            max_fixup_rounds: self.max_fixup_rounds,
            project_name,
        }
    }

    pub fn skips(&self, slug: &str) -> bool {
        self.skip.iter().any(|name| name == slug)
    }
}
