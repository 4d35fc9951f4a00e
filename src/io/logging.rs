//! Diagnostic logging setup for the command-line tool

use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count: warn, info, debug, then trace
pub const fn filter_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "tilewave=warn",
        1 => "tilewave=info",
        2 => "tilewave=debug",
        _ => "tilewave=trace",
    }
}

/// Install a stderr subscriber, preferring `RUST_LOG` when it is set
///
/// Returns `false` if a global subscriber was already installed.
pub fn init(verbosity: u8) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}
