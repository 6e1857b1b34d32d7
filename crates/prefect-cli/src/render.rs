//! Text rendering of reconciliation reports

use std::fmt::Write;

use colored::Colorize;
use prefect_core::{Check, PassReport, RepoReport, Ruleset, Verdict};

const FIXED_MARKER: &str = "✨ ";

/// One `* <description>` line per compiled rule.
pub fn ruleset(ruleset: &Ruleset) -> String {
    let mut out = String::new();
    for rule in ruleset {
        let _ = writeln!(out, "* {}", rule.description());
    }
    out
}

/// Every pass of a repository, in order, followed by the stuck notice when
/// auto-fixing did not converge.
pub fn report(report: &RepoReport) -> String {
    let mut out = String::new();
    let last = report.passes.len().saturating_sub(1);

    for (index, pass) in report.passes.iter().enumerate() {
        render_pass(&mut out, &report.slug, pass);
        if index < last {
            let _ = writeln!(out, "{}", "All problems were automatically fixed.".green());
        }
    }

    if report.verdict == Verdict::Stuck {
        let _ = writeln!(out, "{}", "Auto-fixing seems to be stuck :/".yellow().bold());
    }
    out
}

fn render_pass(out: &mut String, slug: &str, pass: &PassReport) {
    let status = if pass.is_clean() {
        "PASS".green().bold()
    } else {
        "FAIL".red().bold()
    };
    let _ = writeln!(out, "Validating '{slug}' ({})... {status}", pass.project_name);

    for failure in &pass.failures {
        let marker = if failure.fixed { FIXED_MARKER } else { "" };
        let mut lines = failure.message.lines();
        if let Some(first) = lines.next() {
            let _ = writeln!(out, "  {marker}{first}");
        }
        // Continuation lines line up under the first line's text
        let indent = " ".repeat(2 + marker.chars().count());
        for line in lines {
            let _ = writeln!(out, "{indent}{line}");
        }
    }
}
