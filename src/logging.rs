//! Diagnostic logging to stderr.
//!
//! Quiet by default (`warn`); set `GPT_CLI_LOG=debug` to trace requests.

use tracing_subscriber::EnvFilter;

use crate::output;

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "GPT_CLI_LOG";

const DEFAULT_FILTER: &str = "warn";

pub fn init() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // A second init (e.g. in tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!output::is_no_color())
        .with_target(false)
        .without_time()
        .try_init();
}
