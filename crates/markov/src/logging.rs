#![forbid(unsafe_code)]

use tracing_subscriber::EnvFilter;

/// Install the stderr `fmt` subscriber; `RUST_LOG` overrides the `info` default.
///
/// Calling it twice is harmless.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
