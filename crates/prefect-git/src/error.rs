//! Error types for prefect-git

use std::path::PathBuf;

/// Result type for prefect-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in prefect-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] prefect_fs::Error),

    #[error("'{path}' is not a repository or a directory containing repositories")]
    NoRepositories { path: PathBuf },
}
