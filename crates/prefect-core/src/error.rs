//! Error types for prefect-core

use std::path::PathBuf;

/// Result type for prefect-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in prefect-core operations
///
/// Nonconformance is never an error: rules report it as a message. These
/// variants cover configuration mistakes and unreadable files.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reference template directory is missing
    #[error("Reference template '{path}' is not a directory")]
    TemplateNotFound { path: PathBuf },

    /// Template kind control file names a kind we do not know
    #[error("Reference template contains '{file}' with unknown template kind '{value}'")]
    UnknownTemplateKind { file: String, value: String },

    /// File pattern uses more than the supported single-segment wildcard
    #[error("File pattern '{pattern}' is not supported: use a name with at most one '*' and no separators")]
    UnsupportedPattern { pattern: String },

    /// Enumeration was asked to leave the repository
    #[error("'{path}' does not represent a relative subdirectory path")]
    InvalidSubdirectory { path: String },

    /// MSBuild or other XML input could not be parsed
    #[error("Failed to parse XML in '{path}': {message}")]
    Xml { path: String, message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from prefect-fs
    #[error(transparent)]
    Fs(#[from] prefect_fs::Error),

    /// Git error from prefect-git
    #[error(transparent)]
    Git(#[from] prefect_git::Error),

    /// Solution model error from prefect-sln
    #[error(transparent)]
    Solution(#[from] prefect_sln::Error),

    /// Reference template walk failed
    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
