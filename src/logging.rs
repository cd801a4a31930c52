//! Logging setup.
//!
//! Everything, including new-item lines, goes through [`tracing`] to a
//! single stdout subscriber with timestamps and levels.  `RUST_LOG`
//! overrides the default `info` filter, e.g. `RUST_LOG=rssbot=debug`.

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber.  Call once, before anything logs.
pub fn init() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install the tracing subscriber")
}
