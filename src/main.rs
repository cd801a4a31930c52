//! rssbot — polls RSS feeds and logs the items that appear in them.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌───────────┐ once  ┌───────────┐ fetch(url) ┌────────────┐
//! │ config.rs │ ────► │  poll.rs  │ ─────────► │  source/   │
//! │  (YAML)   │       │ (Poller)  │ ◄───────── │ (RSS/HTTP) │
//! └───────────┘       └───────────┘    Feed    └────────────┘
//!                        │     ▲
//!             classify() │     │ Vec<Classified>
//!                        ▼     │
//!                     ┌───────────┐
//!                     │tracker.rs │
//!                     └───────────┘
//! ```
//!
//! * **`config`** — loads the feed list and polling interval from YAML.
//! * **`source/`** — the `FeedSource` trait and the RSS implementation.
//! * **`tracker`** — remembers seen GUIDs per feed and flags new entries.
//! * **`poll`** — runs fetch + classify for every feed, then sleeps, forever.
//! * **`logging`** — the `tracing` subscriber every module logs through.
//! * **`main`** — wires everything together: parse args, load config, and
//!   hand control to the poller.

mod config;
mod logging;
mod poll;
mod source;
mod tracker;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use poll::Poller;
use source::RssSource;

fn main() -> Result<()> {
    logging::init()?;
    info!("starting rssbot");

    // -- parse arguments -----------------------------------------------------
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.into());

    // -- hand over to the poll loop ------------------------------------------
    start(&config_path)?.run()
}

/// Load the configuration and build the poller, without running a cycle.
///
/// Any configuration error is returned here, so the poll loop never starts
/// on a bad config.
fn start(config_path: &str) -> Result<Poller<RssSource>> {
    let config = match config::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            error!(path = %config_path, kind = ?e.kind(), error = %e, "error loading config");
            return Err(e).context("cannot start without a valid configuration");
        }
    };

    if config.interval_clamped() {
        warn!(
            configured = config.interval_minutes,
            using = config::MIN_INTERVAL_MINUTES,
            "interval_minutes below minimum, raising it"
        );
    }
    info!(
        path = %config_path,
        feeds = ?config.feeds.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
        interval_secs = config.interval().as_secs(),
        fetch_timeout = ?config.fetch_timeout(),
        "configuration loaded"
    );

    let source = RssSource::new(config.fetch_timeout()).context("failed to build HTTP client")?;
    let interval = config.interval();
    Ok(Poller::new(source, config.feeds, interval))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, ConfigErrorKind};
    use std::fs;
    use tempfile::TempDir;

    fn config_kind(err: &anyhow::Error) -> Option<ConfigErrorKind> {
        err.downcast_ref::<ConfigError>().map(ConfigError::kind)
    }

    #[test]
    fn missing_config_stops_before_polling() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");

        let err = start(path.to_str().unwrap()).err().unwrap();
        assert_eq!(config_kind(&err), Some(ConfigErrorKind::NotFound));
    }

    #[test]
    fn malformed_config_stops_before_polling() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "feeds: []\ninterval_minutes: 2.7\n").unwrap();

        let err = start(path.to_str().unwrap()).err().unwrap();
        assert_eq!(config_kind(&err), Some(ConfigErrorKind::Malformed));
    }

    #[test]
    fn valid_config_builds_an_idle_poller() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "feeds:\n  - name: a\n    url: http://127.0.0.1:9/rss\ninterval_minutes: 5\n",
        )
        .unwrap();

        let poller = start(path.to_str().unwrap()).unwrap();
        assert_eq!(poller.tracker().len(), 0);
    }
}
