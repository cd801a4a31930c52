//! Feed polling.
//!
//! One [`Poller`] drives every configured feed: it fetches them one after
//! another in configured order, classifies each successful fetch, logs the
//! new items, then sleeps for the configured interval and starts over.
//!
//! ## For contributors
//!
//! The poller is intentionally sequential: a slow feed delays every feed
//! configured after it in that cycle.  Fetch failures are logged and the
//! feed is skipped until the next cycle; there is no retry or backoff.

use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::FeedDescriptor;
use crate::source::{Entry, FeedSource, FetchErrorKind};
use crate::tracker::SeenTracker;

/// A newly discovered item, ready to be reported.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NewItem {
    pub feed_name: String,
    pub title: String,
    pub link: String,
    pub guid: String,
    pub published_at: String,
}

impl NewItem {
    fn from_entry(feed_name: &str, entry: Entry) -> Self {
        Self {
            feed_name: feed_name.to_string(),
            title: entry.title,
            link: entry.link,
            guid: entry.guid,
            published_at: entry.published_at,
        }
    }
}

/// A feed that could not be fetched in a cycle.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FeedFailure {
    pub feed_name: String,
    pub kind: FetchErrorKind,
}

/// Outcome of one pass over all feeds.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct CycleReport {
    /// New items in discovery order.
    pub new_items: Vec<NewItem>,
    /// Feeds skipped this cycle, in configured order.
    pub failures: Vec<FeedFailure>,
    /// Feeds whose first successful fetch happened this cycle.
    pub seeded: Vec<String>,
}

/// Owns the tracker and drives the fetch/classify cycle.
pub struct Poller<S> {
    source: S,
    feeds: Vec<FeedDescriptor>,
    interval: Duration,
    tracker: SeenTracker,
}

impl<S: FeedSource> Poller<S> {
    pub fn new(source: S, feeds: Vec<FeedDescriptor>, interval: Duration) -> Self {
        Self {
            source,
            feeds,
            interval,
            tracker: SeenTracker::new(),
        }
    }

    #[cfg(test)]
    pub fn tracker(&self) -> &SeenTracker {
        &self.tracker
    }

    /// Fetch and classify every feed once, in configured order.
    ///
    /// A failed feed is logged, recorded in the report and skipped; its
    /// tracker state is left untouched and the remaining feeds still run.
    pub fn run_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::default();

        for feed in &self.feeds {
            info!(feed = %feed.name, url = %feed.url, "fetching feed");

            let fetched = match self.source.fetch(&feed.url) {
                Ok(fetched) => fetched,
                Err(e) => {
                    warn!(feed = %feed.name, url = %feed.url, error = %e, "error fetching feed");
                    report.failures.push(FeedFailure {
                        feed_name: feed.name.clone(),
                        kind: e.kind(),
                    });
                    continue;
                }
            };
            debug!(
                feed = %feed.name,
                channel = %fetched.title,
                channel_link = %fetched.link,
                entries = fetched.entries.len(),
                "fetched feed"
            );

            let first_fetch = !self.tracker.is_tracked(&feed.url);
            let classified = self.tracker.classify(&feed.url, fetched.entries);

            if first_fetch {
                info!(
                    feed = %feed.name,
                    seen = self.tracker.seen_count(&feed.url).unwrap_or_default(),
                    "tracking feed, existing items recorded as seen"
                );
                report.seeded.push(feed.name.clone());
                continue;
            }

            for item in classified.into_iter().filter(|c| c.is_new) {
                let published = item.entry.published();
                let new_item = NewItem::from_entry(&feed.name, item.entry);
                info!(
                    feed = %new_item.feed_name,
                    title = %new_item.title,
                    link = %new_item.link,
                    guid = %new_item.guid,
                    published = ?published,
                    "New item found in {}: {} ({})",
                    new_item.feed_name,
                    new_item.title,
                    new_item.link
                );
                report.new_items.push(new_item);
            }
        }

        report
    }

    /// Poll forever: run a cycle, sleep for the interval, repeat.
    ///
    /// There is no shutdown path; the loop ends with the process.
    pub fn run(mut self) -> ! {
        loop {
            let report = self.run_cycle();
            debug!(
                new_items = report.new_items.len(),
                failures = report.failures.len(),
                tracked_feeds = self.tracker.len(),
                next_in_secs = self.interval.as_secs(),
                "cycle complete"
            );
            thread::sleep(self.interval);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
