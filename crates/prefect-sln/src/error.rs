//! Error types for prefect-sln

/// Result type for prefect-sln operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in prefect-sln operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed solution at line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("Invalid GUID '{value}'")]
    InvalidGuid { value: String },

    #[error("Cannot determine the project type of '{path}'")]
    UnknownProjectType { path: String },

    #[error("Solution folder path '{path}' is not of the form /name/")]
    InvalidFolderPath { path: String },

    #[error(transparent)]
    Fs(#[from] prefect_fs::Error),
}

impl Error {
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            message: message.into(),
        }
    }
}
