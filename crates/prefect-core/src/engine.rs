//! The bounded validate/fixup reconciliation loop

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::Result;
use crate::repo::Repo;
use crate::rules::Check;
use crate::ruleset::Ruleset;

/// Options for reconciling repositories
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Apply fixups to failing rules
    pub auto_fix: bool,
    /// Fully auto-fixed passes allowed before the loop is declared stuck
    pub max_fixup_rounds: usize,
    /// Use this project name instead of deriving one from the solution
    pub project_name: Option<String>,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            auto_fix: false,
            max_fixup_rounds: 3,
            project_name: None,
        }
    }
}

/// One rule that did not pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleFailure {
    pub description: String,
    pub message: String,
    /// Whether a fixup was applied during the same pass
    pub fixed: bool,
}

/// Result of validating every rule once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub project_name: String,
    pub failures: Vec<RuleFailure>,
}

impl PassReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Every failure was fixed (vacuously true for a clean pass).
    pub fn all_fixed(&self) -> bool {
        self.failures.iter().all(|failure| failure.fixed)
    }
}

/// Final state of a repository after reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    /// The last pass found nothing to report
    Pass,
    /// Some failure could not be fixed automatically
    Fail,
    /// Fixups kept succeeding without the repository ever converging
    Stuck,
}

/// Everything that happened to one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoReport {
    pub slug: String,
    pub root: PathBuf,
    pub passes: Vec<PassReport>,
    pub verdict: Verdict,
}

impl RepoReport {
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }
}

/// Drives a ruleset against repositories.
#[derive(Debug, Clone)]
pub struct Reconciler<'a> {
    ruleset: &'a Ruleset,
    options: ReconcileOptions,
}

impl<'a> Reconciler<'a> {
    pub fn new(ruleset: &'a Ruleset, options: ReconcileOptions) -> Self {
        Self { ruleset, options }
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    /// Open a fresh snapshot of the repository at `root`.
    fn open(&self, root: &Path) -> Result<Repo> {
        let repo = Repo::open(root, self.ruleset.kind())?;
        Ok(match &self.options.project_name {
            Some(name) => repo.with_project_name(name.clone()),
            None => repo,
        })
    }

    /// Validate every applicable rule once, fixing failures as they are
    /// found when auto-fix is enabled.
    ///
    /// A rule that errors is recorded as an unfixed failure and the pass
    /// moves on.
    pub fn run_pass(&self, repo: &Repo) -> PassReport {
        let mut failures = Vec::new();

        for rule in self.ruleset {
            if self.ruleset.should_skip(rule, repo) {
                tracing::debug!(rule = %rule.description(), slug = %repo.slug(), "skipping rule for repository");
                continue;
            }

            let description = rule.description();
            let message = match rule.validate(repo) {
                Ok(None) => continue,
                Ok(Some(message)) => message,
                Err(e) => {
                    tracing::error!(rule = %description, error = %e, "rule failed to validate");
                    failures.push(RuleFailure {
                        description,
                        message: e.to_string(),
                        fixed: false,
                    });
                    continue;
                }
            };

            let fixed = self.options.auto_fix
                && match rule.fixup(repo) {
                    Ok(fixed) => fixed,
                    Err(e) => {
                        tracing::error!(rule = %description, error = %e, "rule failed to apply fixup");
                        false
                    }
                };

            failures.push(RuleFailure {
                description,
                message: message.trim_end().to_string(),
                fixed,
            });
        }

        PassReport {
            project_name: repo.project_name().to_string(),
            failures,
        }
    }

    /// Reconcile the repository at `root` until it passes, fails, or gets
    /// stuck.
    ///
    /// A pass whose every failure was fixed is repeated against a fresh
    /// snapshot, at most `max_fixup_rounds` times.
    ///
    /// # Errors
    ///
    /// Returns an error only if the repository itself cannot be opened.
    pub fn reconcile(&self, root: &Path) -> Result<RepoReport> {
        let mut passes = Vec::new();
        let mut fix_rounds = 0;

        let (slug, root, verdict) = loop {
            let repo = self.open(root)?;
            let pass = self.run_pass(&repo);

            let verdict = if pass.is_clean() {
                Some(Verdict::Pass)
            } else if !pass.all_fixed() {
                Some(Verdict::Fail)
            } else if fix_rounds >= self.options.max_fixup_rounds {
                Some(Verdict::Stuck)
            } else {
                fix_rounds += 1;
                None
            };

            tracing::debug!(slug = %repo.slug(), failures = pass.failures.len(), ?verdict, "finished pass");
            passes.push(pass);

            if let Some(verdict) = verdict {
                break (repo.slug().to_string(), repo.root().to_path_buf(), verdict);
            }
        };

        Ok(RepoReport {
            slug,
            root,
            passes,
            verdict,
        })
    }
}
