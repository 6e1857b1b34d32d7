//! Shared test utilities for the prefect workspace.
//!
//! This crate provides standardised fixtures so crate test suites do not each
//! grow their own temp-dir and git helpers. It is a dev-dependency only and
//! never published.
//!
//! # Modules
//!
//! - [`git`]: git repository fixtures at three realism levels
//! - [`tree`]: [`TestTree`] builder for reference templates and target repos

pub mod git;
pub mod tree;

pub use tree::TestTree;
