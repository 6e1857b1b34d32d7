//! Prefect CLI
//!
//! Compiles a reference template into rules and reconciles repositories
//! against it.

mod cli;
mod commands;
mod error;
mod interactive;
mod logging;
mod render;
mod settings;

use clap::Parser;
use colored::Colorize;
use prefect_core::Ruleset;

use cli::Cli;
use error::Result;
use settings::Settings;

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Returns whether every repository passed.
fn run() -> Result<bool> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let settings = Settings::resolve(&cli)?;
    let ruleset = Ruleset::load(&cli.template)?;
    tracing::debug!(template = %cli.template.display(), rules = ruleset.len(), "compiled template");

    if cli.repos.is_empty() {
        commands::run_list(&ruleset, cli.json)?;
        return Ok(true);
    }

    commands::run_validate(&ruleset, &cli.repos, &settings, cli.project_name.clone(), cli.json)
}
