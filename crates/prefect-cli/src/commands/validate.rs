//! Validating (and optionally fixing) repositories against a template

use std::path::{Path, PathBuf};

use colored::Colorize;
use prefect_core::{Reconciler, RepoReport, Ruleset};

use crate::error::{CliError, Result};
use crate::interactive::{self, Choice};
use crate::render;
use crate::settings::Settings;

/// Expand repository arguments into repository roots.
///
/// Duplicates keep their first position and roots whose folder name is
/// skipped are dropped.
pub fn resolve_repositories(args: &[PathBuf], settings: &Settings) -> Result<Vec<PathBuf>> {
    let mut roots: Vec<PathBuf> = Vec::new();
    for arg in args {
        for root in prefect_git::discovery::resolve(arg)? {
            if !roots.contains(&root) {
                roots.push(root);
            }
        }
    }

    roots.retain(|root| {
        let skipped = settings.skips(&slug_of(root));
        if skipped {
            tracing::debug!(root = %root.display(), "skipping repository");
        }
        !skipped
    });

    if roots.is_empty() {
        return Err(CliError::user("No repositories matched the given arguments."));
    }
    Ok(roots)
}

fn slug_of(root: &Path) -> String {
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Reconcile every repository in turn.
///
/// Returns `true` when every repository passed.
pub fn run_validate(
    ruleset: &Ruleset,
    repos: &[PathBuf],
    settings: &Settings,
    project_name: Option<String>,
    json: bool,
) -> Result<bool> {
    let roots = resolve_repositories(repos, settings)?;
    if project_name.is_some() && roots.len() > 1 {
        return Err(CliError::user(
            "--project-name cannot be used with more than one repository.",
        ));
    }

    let reconciler = Reconciler::new(ruleset, settings.reconcile_options(project_name));
    let mut reports: Vec<RepoReport> = Vec::new();
    let mut all_passed = true;

    'repos: for root in &roots {
        loop {
            let report = match reconciler.reconcile(root) {
                Ok(report) => report,
                Err(e) => {
                    tracing::error!(root = %root.display(), error = %e, "could not open repository");
                    eprintln!("{}: {}: {}", "error".red().bold(), root.display(), e);
                    all_passed = false;
                    continue 'repos;
                }
            };

            if !json {
                print!("{}", render::report(&report));
            }

            let passed = report.passed();
            if passed || !settings.interactive {
                all_passed &= passed;
                reports.push(report);
                break;
            }

            match interactive::ask(&report.slug)? {
                Choice::Revalidate => continue,
                Choice::Skip => {
                    all_passed = false;
                    reports.push(report);
                    break;
                }
                Choice::Abort => {
                    all_passed = false;
                    reports.push(report);
                    break 'repos;
                }
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    let failed = reports.iter().filter(|report| !report.passed()).count();
    tracing::info!(repositories = roots.len(), failed, "finished validation");
    Ok(all_passed)
}
