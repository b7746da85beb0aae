//! Progress logging.
//!
//! Build steps log through `tracing`; this module installs the subscriber the
//! CLI uses. Log lines go to stderr so the report printed on stdout stays
//! clean when piped.
//!
//! The level is chosen in this order:
//! 1. `--verbose`: debug for this crate
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`, when set and valid
//! 4. info for this crate

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "sitebake=debug";
const QUIET_FILTER: &str = "sitebake=error";
const DEFAULT_FILTER: &str = "sitebake=info";

fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Install the global subscriber. Call once, before the first log line.
///
/// `verbose` wins over `quiet` when both are set.
pub fn init_logger(verbose: bool, quiet: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(filter_for(verbose, quiet))
        .with(fmt_layer)
        .init();
}
