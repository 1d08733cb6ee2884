//! Tracing setup for the CLI. Logs go to stderr so stdout carries only the JSON output.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
/// Level comes from RUST_LOG (e.g. info, debug); defaults to info when unset.
/// Load `.env` before calling this, otherwise RUST_LOG from `.env` has no effect.
pub fn init_tracing() -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))
}
