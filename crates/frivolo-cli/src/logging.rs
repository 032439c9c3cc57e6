//! Subscriber bootstrap. Logs go to stderr so the REPL on stdout stays clean.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

const FALLBACK_DIRECTIVE: &str = "warn";

/// Installs the global subscriber.
///
/// `directive` is an `EnvFilter` string such as `"info"` or
/// `"frivolo_infrastructure=debug"`. An unparsable directive falls back to
/// warnings only.
pub fn init(directive: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_new(directive).or_else(|e| {
        eprintln!("invalid log filter '{}': {}", directive, e);
        EnvFilter::try_new(FALLBACK_DIRECTIVE)
    })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow!("failed to initialise logging: {}", e))
}
