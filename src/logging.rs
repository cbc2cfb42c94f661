//! Diagnostic logging to stderr
//!
//! `BOM_MERGE_LOG` takes an `EnvFilter` directive string and wins over the
//! verbosity flags. Otherwise `-v` logs at debug, `-q` at error, and the
//! default is warn.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding filter directives
pub const LOG_ENV: &str = "BOM_MERGE_LOG";

/// Level implied by the command-line verbosity flags
pub fn default_level(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    }
}

/// Install the global subscriber; a second call is a no-op
pub fn init_logging(verbose: bool, quiet: bool) {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose, quiet)));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    // try_init fails only if a subscriber is already installed
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
