//! Filesystem primitives for Prefect
//!
//! Provides forward-slash path normalization, content hashing, atomic
//! writes, line-ending handling and the newline-delimited file index format
//! used by reference template control files.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod index;
pub mod io;
pub mod line_endings;
pub mod path;

pub use config::ConfigStore;
pub use constants::ControlFile;
pub use error::{Error, Result};
pub use index::FileIndex;
pub use line_endings::LineEnding;
pub use path::{NormalizedPath, canonicalize, relative_to};
