//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;

/// Prefect - bring repositories in line with a reference template
///
/// Examples:
///   prefect reference                       # List the compiled rules
///   prefect reference repos/widgets         # Validate one repository
///   prefect reference repos --auto-fix      # Validate and fix every repository under repos/
///   prefect reference repos --skip legacy   # Leave repos/legacy alone
#[derive(Parser, Debug)]
#[command(name = "prefect")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Reference template directory
    #[arg(env = "PREFECT_TEMPLATE")]
    pub template: PathBuf,

    /// Repository roots, or directories whose children are repository roots
    pub repos: Vec<PathBuf>,

    /// Skip the repository with this folder name (repeatable)
    #[arg(long, value_name = "NAME")]
    pub skip: Vec<String>,

    /// Pause after a failing repository to re-validate, skip or abort
    #[arg(short, long)]
    pub interactive: bool,

    /// Apply fixups to failing rules
    #[arg(short, long)]
    pub auto_fix: bool,

    /// Use this project name instead of deriving one from the solution
    #[arg(long, value_name = "NAME")]
    pub project_name: Option<String>,

    /// Load run settings from a TOML, JSON or YAML file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the reports as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
