//! Command implementations for prefect-cli

pub mod list;
pub mod validate;

pub use list::run_list;
pub use validate::run_validate;
