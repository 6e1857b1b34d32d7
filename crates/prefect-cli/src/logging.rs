//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Logs go to stderr so they never mix with
/// the report on stdout.
///
/// `RUST_LOG` takes precedence over `--verbose`.
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: a tracing subscriber is already installed");
    }
    tracing::debug!("logging initialized");
}
