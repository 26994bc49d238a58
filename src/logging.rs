//! Logging setup
//!
//! Installs a `tracing-subscriber` registry writing to stdout. The filter
//! comes from the explicit argument (usually `ClusterConfig::log_filter`),
//! then `RUST_LOG`, then defaults to "info".

use anyhow::{Context, Result};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Build the filter used by [`init_logging`]
pub fn env_filter(filter: Option<&str>) -> Result<tracing_subscriber::EnvFilter> {
    match filter {
        Some(directives) => tracing_subscriber::EnvFilter::try_new(directives)
            .with_context(|| format!("Invalid log filter '{}'", directives)),
        None => Ok(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))),
    }
}

/// Initialize logging to stdout
///
/// # Errors
///
/// Fails if `filter` does not parse or a global subscriber is already set.
pub fn init_logging(filter: Option<&str>) -> Result<()> {
    let env_filter = env_filter(filter)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_filter(env_filter),
        )
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    Ok(())
}
