//! End-to-end conformance properties for generic templates
//!
//! Exercises the complete flow: template compilation -> validation -> fixup
//! -> re-validation, against repositories built on disk.

use prefect_core::template::{self, PathTemplate};
use prefect_core::{Check, ReconcileOptions, Reconciler, Repo, Ruleset, TemplateKind, Verdict};
use prefect_test_utils::TestTree;
use pretty_assertions::assert_eq;
use rstest::rstest;
use walkdir::WalkDir;

/// A template where every rule has a working fixup.
fn fixable_template() -> TestTree {
    let template = TestTree::named("reference");
    template
        .file(".prefect-interpolated-files", "docs/$PROJECT$.md\n")
        .file(".prefect-ignore-content", "CHANGELOG.md\n")
        .file("LICENSE", "MIT License\r\n\r\nCopyright (c) Acme\r\n")
        .file("CHANGELOG.md", "# Changes\n")
        .file("docs/$PROJECT$.md", "# $PROJECT$\n\nSee https://example.org/$REPO-SLUG$\n")
        .dir("assets/icons");
    template
}

fn widgets_repo() -> TestTree {
    let repo = TestTree::named("widgets-repo");
    repo.fake_git();
    repo.file("Acme.Widgets.sln", "");
    repo
}

fn open(repo: &TestTree) -> Repo {
    Repo::open(repo.root(), TemplateKind::None).unwrap()
}

/// Snapshot of every file under the repository, for idempotence checks.
fn tree_state(repo: &TestTree) -> Vec<(String, Vec<u8>)> {
    WalkDir::new(repo.root())
        .sort_by_file_name()
        .into_iter()
        .map(Result::unwrap)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            let relative = prefect_fs::relative_to(repo.root(), entry.path()).unwrap();
            (relative, std::fs::read(entry.path()).unwrap())
        })
        .collect()
}

#[test]
fn test_conformant_repository_passes_every_rule() {
    let template = fixable_template();
    let ruleset = Ruleset::load(template.root()).unwrap();
    let repo = widgets_repo();
    repo.file("LICENSE", template.read_bytes("LICENSE"))
        .file("CHANGELOG.md", "# Something else\n")
        .file("docs/Acme.Widgets.md", "# Acme.Widgets\n\nSee https://example.org/widgets-repo\n")
        .dir("assets/icons");

    let snapshot = open(&repo);
    for rule in &ruleset {
        assert_eq!(rule.validate(&snapshot).unwrap(), None, "{}", rule.description());
    }
}

#[test]
fn test_every_fixup_is_complete() {
    let template = fixable_template();
    let ruleset = Ruleset::load(template.root()).unwrap();
    let repo = widgets_repo();
    repo.file("LICENSE", "stale\n");

    for rule in &ruleset {
        let snapshot = open(&repo);
        if rule.validate(&snapshot).unwrap().is_none() {
            continue;
        }
        assert!(rule.fixup(&snapshot).unwrap(), "{}", rule.description());
        assert_eq!(rule.validate(&open(&repo)).unwrap(), None, "{}", rule.description());
    }
}

#[test]
fn test_fixups_are_idempotent() {
    let template = fixable_template();
    let ruleset = Ruleset::load(template.root()).unwrap();
    let repo = widgets_repo();

    for rule in &ruleset {
        rule.fixup(&open(&repo)).unwrap();
    }
    let once = tree_state(&repo);

    for rule in &ruleset {
        rule.fixup(&open(&repo)).unwrap();
    }
    assert_eq!(tree_state(&repo), once);
}

#[test]
fn test_reconciler_converges_on_fixable_template() {
    let template = fixable_template();
    let ruleset = Ruleset::load(template.root()).unwrap();
    let repo = widgets_repo();
    let options = ReconcileOptions {
        auto_fix: true,
        ..ReconcileOptions::default()
    };

    let report = Reconciler::new(&ruleset, options).reconcile(repo.root()).unwrap();

    assert_eq!(report.verdict, Verdict::Pass);
    assert_eq!(report.passes.len(), 2);
    assert_eq!(repo.read_bytes("LICENSE"), template.read_bytes("LICENSE"));
    assert_eq!(
        repo.read("docs/Acme.Widgets.md").replace("\r\n", "\n"),
        "# Acme.Widgets\n\nSee https://example.org/widgets-repo\n"
    );
    // Ignored content is copied once, verbatim
    assert_eq!(repo.read("CHANGELOG.md"), "# Changes\n");
    repo.assert_exists("assets/icons");
}

#[test]
fn test_fixups_wait_for_a_project_name() {
    let template = fixable_template();
    let ruleset = Ruleset::load(template.root()).unwrap();
    let repo = TestTree::named("widgets-repo");
    repo.fake_git();
    let options = ReconcileOptions {
        auto_fix: true,
        ..ReconcileOptions::default()
    };

    let report = Reconciler::new(&ruleset, options).reconcile(repo.root()).unwrap();

    assert_eq!(report.verdict, Verdict::Fail);
    repo.assert_exists("LICENSE");
    assert!(!repo.path("docs").read_dir().unwrap().any(|_| true));
}

#[rstest]
#[case("$PROJECT$/src/$PROJECT$.csproj")]
#[case("https://example.org/$REPO-SLUG$/$PROJECT$")]
#[case("$(TargetDir)$PROJECT$.dll")]
#[case("no holes at all")]
fn test_interpolating_known_variables_leaves_no_holes(#[case] text: &str) {
    let values = PathTemplate::new("Acme.Widgets", "widgets-repo");
    let output = values.interpolate(text, |name| panic!("unexpected variable {name}"));
    assert!(template::holes(&output).is_empty(), "{output}");
}

#[test]
fn test_git_ignored_files_are_invisible() {
    let template = TestTree::named("reference");
    template.file(".prefect-must-not-exist", "scratch/notes.txt\n");
    let ruleset = Ruleset::load(template.root()).unwrap();

    let repo = TestTree::named("widgets-repo");
    repo.real_git();
    repo.file("Acme.Widgets.sln", "")
        .file(".gitignore", "/scratch/\n")
        .file("scratch/notes.txt", "todo\n");

    // Must-not-exist checks the path directly, ignore rules do not hide it
    let report = Reconciler::new(&ruleset, ReconcileOptions::default())
        .reconcile(repo.root())
        .unwrap();
    assert_eq!(report.verdict, Verdict::Fail);

    let snapshot = open(&repo);
    assert!(snapshot.is_ignored("scratch", true));
    assert!(snapshot.all_files().all(|file| !file.unwrap().relative.starts_with("scratch/")));
}
