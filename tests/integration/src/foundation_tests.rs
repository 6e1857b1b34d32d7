//! End-to-end scenarios for Bonsai Foundation templates

use std::collections::BTreeSet;

use prefect_core::{ReconcileOptions, Reconciler, RepoReport, Ruleset, Verdict};
use prefect_sln::Solution;
use prefect_test_utils::TestTree;
use pretty_assertions::assert_eq;

const LIBRARY_PROJECT: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <Title>Bonsai - Widgets</Title>
    <Description>Widgets for Bonsai.</Description>
  </PropertyGroup>
</Project>
"#;

fn foundation_template() -> TestTree {
    let template = TestTree::named("reference");
    template
        .file(".prefect-template-kind", "BonsaiFoundation\n")
        .file(".prefect-must-not-exist", "NuGet.config\n");
    template
}

/// A git repository with fixable drift: a legacy `.gitignore`, a solution
/// missing its project, and no launch settings.
fn drifted_repo(name: &str) -> TestTree {
    let repo = TestTree::named(name);
    repo.real_git();
    repo.file("Bonsai.Widgets.sln", Solution::new().to_string())
        .file(".gitignore", "/scratch/\nbin/\nobj/\n")
        .file("scratch/Stray/Stray.csproj", "<Project />")
        .file("src/Bonsai.Widgets/Bonsai.Widgets.csproj", LIBRARY_PROJECT)
        .file(".bonsai/NuGet.config", "<configuration />");
    repo
}

fn reconcile(ruleset: &Ruleset, repo: &TestTree, auto_fix: bool) -> RepoReport {
    let options = ReconcileOptions {
        auto_fix,
        ..ReconcileOptions::default()
    };
    Reconciler::new(ruleset, options).reconcile(repo.root()).unwrap()
}

fn failing_rules(report: &RepoReport) -> BTreeSet<String> {
    report
        .passes
        .last()
        .map(|pass| pass.failures.iter().map(|f| f.description.clone()).collect())
        .unwrap_or_default()
}

#[test]
fn test_fixable_drift_is_repaired() {
    let template = foundation_template();
    let ruleset = Ruleset::load(template.root()).unwrap();
    let repo = drifted_repo("widgets");

    let before = failing_rules(&reconcile(&ruleset, &repo, false));
    assert!(before.contains("'.gitignore' meets the standards for modern .NET projects"));
    assert!(before.contains("All 'launchSettings.json' files have the expected content."));
    assert!(before.contains("Solution reflects the contents of the repository."));

    // Missing LICENSE has no fixup, so the run still fails
    let fixed = reconcile(&ruleset, &repo, true);
    assert_eq!(fixed.verdict, Verdict::Fail);

    let after = failing_rules(&reconcile(&ruleset, &repo, false));
    assert!(after.contains("LICENSE contains the appropriate license"));
    assert!(!after.contains("'.gitignore' meets the standards for modern .NET projects"));
    assert!(!after.contains("All 'launchSettings.json' files have the expected content."));
    assert!(!after.contains("Solution reflects the contents of the repository."));

    repo.assert_exists("src/Bonsai.Widgets/Properties/launchSettings.json");
    let gitignore = repo.read(".gitignore");
    assert!(gitignore.contains("/scratch/"));
    assert!(!gitignore.lines().any(|line| line == "bin/"));
}

#[test]
fn test_solution_ignores_git_ignored_projects() {
    let template = foundation_template();
    let ruleset = Ruleset::load(template.root()).unwrap();
    let repo = drifted_repo("widgets");

    reconcile(&ruleset, &repo, true);

    let solution = Solution::load(&repo.path("Bonsai.Widgets.sln")).unwrap();
    let projects: Vec<_> = solution.projects().map(|p| p.path.clone()).collect();
    assert_eq!(projects, vec!["src/Bonsai.Widgets/Bonsai.Widgets.csproj"]);
}

#[test]
fn test_bonsai_package_sources_are_exempt() {
    let template = foundation_template();
    let ruleset = Ruleset::load(template.root()).unwrap();
    let repo = drifted_repo("widgets");

    let report = reconcile(&ruleset, &repo, false);
    let messages: Vec<_> = report.passes[0]
        .failures
        .iter()
        .map(|f| f.message.as_str())
        .collect();
    assert!(messages.iter().all(|m| !m.contains("NuGet.config")), "{messages:#?}");

    repo.file("NuGet.config", "<configuration />");
    let report = reconcile(&ruleset, &repo, true);
    let failure = report.passes[0]
        .failures
        .iter()
        .find(|f| f.message == "File 'NuGet.config' must not exist.")
        .unwrap();
    assert!(!failure.fixed);
    repo.assert_exists("NuGet.config");
}

#[test]
fn test_alternate_license_repositories_skip_license_rule() {
    let template = foundation_template();
    let ruleset = Ruleset::load(template.root()).unwrap();

    let widgets = drifted_repo("widgets");
    assert!(failing_rules(&reconcile(&ruleset, &widgets, false)).contains("LICENSE contains the appropriate license"));

    let tld = drifted_repo("tld");
    assert!(!failing_rules(&reconcile(&ruleset, &tld, false)).contains("LICENSE contains the appropriate license"));
}

#[test]
fn test_harp_solution_root() {
    let template = TestTree::named("reference");
    template.file(".prefect-template-kind", "HarpTech\n");
    let ruleset = Ruleset::load(template.root()).unwrap();
    assert_eq!(ruleset.len(), 1);

    let repo = TestTree::named("device.widget");
    repo.real_git();
    repo.file("Interface/Harp.Widget.sln", "");

    let report = reconcile(&ruleset, &repo, false);
    assert_eq!(report.verdict, Verdict::Pass);
    assert_eq!(report.passes[0].project_name, "Harp.Widget");
}
