//! [`TestTree`] builder for template and repository scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory tree with helpers for setup and assertion.
///
/// The same builder serves both sides of a scenario: the reference template
/// and the candidate repository.
///
/// # Example
///
/// ```rust,no_run
/// use prefect_test_utils::TestTree;
///
/// let template = TestTree::new();
/// template.file("LICENSE", "MIT");
/// template.dir("build");
///
/// let repo = TestTree::named("widgets-repo");
/// repo.fake_git();
/// repo.assert_missing("LICENSE");
/// ```
pub struct TestTree {
    temp_dir: TempDir,
    root: PathBuf,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("TestTree::new: failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        Self { temp_dir, root }
    }

    /// Create an empty directory with a specific folder name.
    ///
    /// Repository slugs are derived from the folder name, so scenarios that
    /// care about the slug use this constructor.
    pub fn named(name: &str) -> Self {
        let temp_dir = TempDir::new().expect("TestTree::named: failed to create temp dir");
        let root = temp_dir.path().join(name);
        fs::create_dir_all(&root).expect("TestTree::named: failed to create root");
        Self { temp_dir, root }
    }

    /// Return the root path of the tree.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return the directory holding the root (the temp dir itself).
    pub fn container(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Resolve a relative path against the root.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Write a file, creating parent directories.
    pub fn file(&self, relative: &str, content: impl AsRef<[u8]>) -> &Self {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        self
    }

    /// Create a directory and its parents.
    pub fn dir(&self, relative: &str) -> &Self {
        fs::create_dir_all(self.path(relative)).unwrap();
        self
    }

    /// Mark the root as a repository with a fake `.git` directory.
    pub fn fake_git(&self) -> &Self {
        crate::git::fake_git_dir(&self.root);
        self
    }

    /// Turn the root into a real git repository.
    pub fn real_git(&self) -> git2::Repository {
        crate::git::real_git_repo(&self.root)
    }

    /// Read a file as UTF-8.
    pub fn read(&self, relative: &str) -> String {
        let path = self.path(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// Read a file as raw bytes.
    pub fn read_bytes(&self, relative: &str) -> Vec<u8> {
        let path = self.path(relative);
        fs::read(&path).unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// Assert that `relative` exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_exists(&self, relative: &str) {
        let full_path = self.path(relative);
        assert!(
            full_path.exists(),
            "Expected path to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `relative` does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_missing(&self, relative: &str) {
        let full_path = self.path(relative);
        assert!(
            !full_path.exists(),
            "Expected path NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `relative` contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_contains(&self, relative: &str, content: &str) {
        let file_content = self.read(relative);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            relative,
            content,
            file_content
        );
    }
}
