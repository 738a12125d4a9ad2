//! Subscriber setup. Library crates log through `log`; the subscriber's
//! `tracing-log` bridge picks those records up.

use crate::cli::GlobalArgs;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` wins over `--verbose`.
pub(crate) fn init(global: &GlobalArgs) {
    let default_level = if global.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Reports go to stdout, logs to stderr.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(global.verbose)
        .with_writer(std::io::stderr)
        .try_init();
}
