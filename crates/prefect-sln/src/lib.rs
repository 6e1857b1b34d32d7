//! Solution file model for Prefect
//!
//! Reads the text `.sln` format into an editable model of projects, solution
//! folders and configuration mappings, and writes it back. Sections the model
//! does not understand are carried through untouched so that a rewrite only
//! changes what was edited.

pub mod error;
pub mod model;
mod parse;
pub mod types;
mod write;

pub use error::{Error, Result};
pub use model::{ConfigMapping, Folder, Project, Solution, SolutionConfiguration};
