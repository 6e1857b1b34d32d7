//! Interactive pause after a failing repository
//!
//! Uses dialoguer for terminal-based interactive selection.

use dialoguer::Select;

use crate::error::Result;

/// What to do with a repository that did not pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Run reconciliation again, usually after a manual edit
    Revalidate,
    /// Leave the repository failed and move on
    Skip,
    /// Stop processing repositories
    Abort,
}

impl Choice {
    pub const ALL: [Choice; 3] = [Choice::Revalidate, Choice::Skip, Choice::Abort];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Revalidate => "Re-validate",
            Self::Skip => "Skip repository",
            Self::Abort => "Abort",
        }
    }
}

/// Ask the operator how to continue after `slug` failed.
pub fn ask(slug: &str) -> Result<Choice> {
    let labels: Vec<&str> = Choice::ALL.iter().map(Choice::label).collect();
    let index = Select::new()
        .with_prompt(format!("'{slug}' did not pass"))
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(Choice::ALL.get(index).copied().unwrap_or(Choice::Abort))
}
