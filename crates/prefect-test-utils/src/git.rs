//! Git repository fixtures at three realism levels.
//!
//! Use the lowest-realism fixture the test needs.

use std::fs;
use std::path::Path;

use git2::{Repository, Signature};

/// Creates a minimal `.git` directory structure **without** initialising a real
/// git repository.
///
/// Realism level: **FAKE**: directory structure only, no git object store.
///
/// Use for: tests that need a `.git` marker to satisfy repository detection
/// but never consult ignore rules or revisions.
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn fake_git_dir(path: &Path) {
    fs::create_dir_all(path.join(".git/refs/heads"))
        .unwrap_or_else(|e| panic!("fake_git_dir: failed to create .git: {e}"));
    fs::write(path.join(".git/HEAD"), "ref: refs/heads/main\n")
        .unwrap_or_else(|e| panic!("fake_git_dir: failed to write HEAD: {e}"));
}

/// Initialises a real git repository using `git2` (no commits).
///
/// Realism level: **REAL**: valid git object store, empty history. Enough for
/// `.gitignore` evaluation.
///
/// # Panics
/// Panics if `git2::Repository::init` fails.
pub fn real_git_repo(path: &Path) -> Repository {
    Repository::init(path).unwrap_or_else(|e| {
        panic!(
            "real_git_repo: failed to init repository at {}: {e}",
            path.display()
        )
    })
}

/// Initialises a real git repository and commits everything currently in the
/// directory.
///
/// Realism level: **REAL WITH HISTORY**: one commit on the default branch.
///
/// Returns the commit id as a hex string.
///
/// # Panics
/// Panics if any git operation fails.
pub fn real_git_repo_with_commit(path: &Path) -> String {
    let repo = real_git_repo(path);
    commit_all(&repo, "Initial commit")
}

/// Stage every file in the work tree and commit it on top of HEAD.
///
/// # Panics
/// Panics if any git operation fails.
pub fn commit_all(repo: &Repository, message: &str) -> String {
    let mut index = repo.index().expect("commit_all: failed to open index");
    index
        .add_all(["*"], git2::IndexAddOption::DEFAULT, None)
        .expect("commit_all: failed to stage files");
    index.write().expect("commit_all: failed to write index");
    let tree_id = index.write_tree().expect("commit_all: failed to write tree");
    let tree = repo.find_tree(tree_id).expect("commit_all: tree vanished");

    let signature = Signature::now("Test User", "test@test.com")
        .expect("commit_all: failed to build signature");
    let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

    let id = repo
        .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .expect("commit_all: failed to commit");
    id.to_string()
}
