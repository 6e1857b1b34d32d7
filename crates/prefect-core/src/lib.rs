//! Template-to-repository conformance engine for Prefect
//!
//! A reference template is a directory tree describing what a conformant
//! repository looks like. This crate compiles such a tree into an ordered
//! [`Ruleset`], evaluates it against candidate repositories, and drives the
//! bounded auto-fix loop:
//!
//! ```text
//!  reference template ──► Ruleset ──┐
//!                                   ├──► Reconciler ──► RepoReport
//!  repository root ──────► Repo ────┘        │
//!                                            └── fixups applied on disk
//! ```
//!
//! # Example
//!
//! ```no_run
//! use prefect_core::{ReconcileOptions, Reconciler, Ruleset};
//!
//! fn example() -> prefect_core::Result<()> {
//!     let ruleset = Ruleset::load("reference".as_ref())?;
//!     let reconciler = Reconciler::new(&ruleset, ReconcileOptions::default());
//!     let report = reconciler.reconcile("repos/widgets".as_ref())?;
//!     println!("{}: {:?}", report.slug, report.verdict);
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod error;
pub mod kind;
pub mod repo;
pub mod rules;
pub mod ruleset;
pub mod template;

pub use engine::{PassReport, ReconcileOptions, Reconciler, RepoReport, RuleFailure, Verdict};
pub use error::{Error, Result};
pub use kind::TemplateKind;
pub use repo::{FilePattern, Repo, RepoFile, Search};
pub use rules::{Check, Rule};
pub use ruleset::Ruleset;
pub use template::PathTemplate;
