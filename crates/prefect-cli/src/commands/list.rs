//! Listing the compiled rules of a template

use prefect_core::{Check, Ruleset};

use crate::error::Result;
use crate::render;

/// Print every compiled rule, as text or as a JSON array of descriptions.
pub fn run_list(ruleset: &Ruleset, json: bool) -> Result<()> {
    if json {
        let descriptions: Vec<String> = ruleset.rules().iter().map(Check::description).collect();
        println!("{}", serde_json::to_string_pretty(&descriptions)?);
    } else {
        print!("{}", render::ruleset(ruleset));
    }
    tracing::debug!(kind = %ruleset.kind(), rules = ruleset.len(), "listed rules");
    Ok(())
}
