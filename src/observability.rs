//! Logging setup for the command-line tool.
//!
//! Stdout carries only the computed version, so every log line goes to
//! stderr.

use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Build an `EnvFilter` based on the verbosity flag and environment.
///
/// Priority: verbose flag > RUST_LOG env > `warn`
pub fn env_filter(verbose: u8) -> EnvFilter {
    match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("gitver=debug"),
        _ => EnvFilter::new("gitver=trace"),
    }
}

/// Install the global stderr subscriber
pub fn init_logging(verbose: u8) {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(fmt_layer)
        .try_init();
}
