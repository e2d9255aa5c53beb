//! Diagnostic logging for the CLI.

use std::io;

use tracing_subscriber::EnvFilter;

/// Installs a stderr subscriber for the given `-v` count.
///
/// `RUST_LOG` takes precedence when set.
pub fn init(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
