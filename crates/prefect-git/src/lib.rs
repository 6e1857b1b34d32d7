//! Git collaborators for Prefect
//!
//! The reconciliation engine only needs three things from version control:
//! whether a path is ignored, where repositories live, and which revision a
//! checkout currently points at. Everything else stays out of the core.

pub mod discovery;
pub mod error;
pub mod ignore;
pub mod revision;

pub use error::{Error, Result};
pub use ignore::{GitIgnore, IgnoreMatcher, NoIgnore};
