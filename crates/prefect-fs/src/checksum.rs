//! SHA-256 checksum utilities
//!
//! Content rules compare reference and target files by digest rather than by
//! holding both files in memory for the whole run.

use sha2::{Digest, Sha256};
use std::path::Path;

use crate::{Error, Result};

/// A raw SHA-256 digest.
pub type Digest256 = [u8; 32];

/// Compute the SHA-256 digest of in-memory content.
pub fn content_digest(content: &[u8]) -> Digest256 {
    Sha256::digest(content).into()
}

/// Compute the SHA-256 digest of a file's contents.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn file_digest(path: &Path) -> Result<Digest256> {
    let content = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(content_digest(&content))
}
