//! Per-feed new-item detection.
//!
//! [`SeenTracker`] remembers, for every feed URL, each GUID observed since
//! the process started.  Classifying a fetched entry list against that
//! memory answers "which of these have we not seen before?".
//!
//! The first successful fetch of a feed only seeds its memory: nothing from
//! that snapshot is reported as new.  After that an entry is new exactly
//! when its GUID has never been observed for that feed, and it is recorded
//! the moment it is classified.
//!
//! Memory is never released.  A GUID stays recorded after its item drops
//! out of the feed, so the per-feed sets grow for the lifetime of the
//! process.

use std::collections::{HashMap, HashSet};

use crate::source::Entry;

/// What the tracker knows about one feed.
#[derive(Debug, Default)]
pub struct FeedState {
    seen_guids: HashSet<String>,
}

impl FeedState {
    #[cfg(test)]
    pub fn contains(&self, guid: &str) -> bool {
        self.seen_guids.contains(guid)
    }

    pub fn len(&self) -> usize {
        self.seen_guids.len()
    }
}

/// An entry together with its classification.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Classified {
    pub entry: Entry,
    pub is_new: bool,
}

/// Seen-GUID memory for every feed, keyed by feed URL.
#[derive(Debug, Default)]
pub struct SeenTracker {
    feeds: HashMap<String, FeedState>,
}

impl SeenTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a freshly fetched entry list for `feed_url`, recording every
    /// GUID in it.
    ///
    /// Output order is input order.  Within one call an entry whose GUID
    /// repeats an earlier entry of the same call is never new: the first
    /// occurrence is recorded before the second is checked.
    pub fn classify(&mut self, feed_url: &str, entries: Vec<Entry>) -> Vec<Classified> {
        let Some(state) = self.feeds.get_mut(feed_url) else {
            // Baseline: the first snapshot only seeds the memory.
            let state = self.feeds.entry(feed_url.to_string()).or_default();
            return entries
                .into_iter()
                .map(|entry| {
                    state.seen_guids.insert(entry.guid.clone());
                    Classified {
                        entry,
                        is_new: false,
                    }
                })
                .collect();
        };

        entries
            .into_iter()
            .map(|entry| {
                // `insert` is true only the first time a GUID is recorded.
                let is_new = state.seen_guids.insert(entry.guid.clone());
                Classified { entry, is_new }
            })
            .collect()
    }

    /// Whether `feed_url` has had at least one successful classification.
    pub fn is_tracked(&self, feed_url: &str) -> bool {
        self.feeds.contains_key(feed_url)
    }

    /// Number of distinct GUIDs recorded for `feed_url`, or `None` if the
    /// feed is not tracked yet.
    pub fn seen_count(&self, feed_url: &str) -> Option<usize> {
        self.feeds.get(feed_url).map(FeedState::len)
    }

    #[cfg(test)]
    pub fn state(&self, feed_url: &str) -> Option<&FeedState> {
        self.feeds.get(feed_url)
    }

    /// Number of tracked feeds.
    pub fn len(&self) -> usize {
        self.feeds.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = "https://example.com/rss";

    fn entry(guid: &str) -> Entry {
        Entry {
            title: format!("title {guid}"),
            link: format!("https://example.com/{guid}"),
            guid: guid.to_string(),
            ..Entry::default()
        }
    }

    fn entries(guids: &[&str]) -> Vec<Entry> {
        guids.iter().map(|g| entry(g)).collect()
    }

    fn new_guids(classified: &[Classified]) -> Vec<&str> {
        classified
            .iter()
            .filter(|c| c.is_new)
            .map(|c| c.entry.guid.as_str())
            .collect()
    }

    #[test]
    fn new_tracker_is_empty() {
        let tracker = SeenTracker::new();
        assert_eq!(tracker.len(), 0);
        assert!(!tracker.is_tracked(FEED));
        assert_eq!(tracker.seen_count(FEED), None);
    }

    #[test]
    fn first_fetch_reports_nothing_and_seeds_state() {
        let mut tracker = SeenTracker::new();
        let out = tracker.classify(FEED, entries(&["a", "b", "c", "d"]));

        assert_eq!(out.len(), 4);
        assert!(new_guids(&out).is_empty());
        assert!(tracker.is_tracked(FEED));
        assert_eq!(tracker.seen_count(FEED), Some(4));
    }

    #[test]
    fn empty_first_fetch_still_starts_tracking() {
        let mut tracker = SeenTracker::new();
        assert!(tracker.classify(FEED, Vec::new()).is_empty());
        assert!(tracker.is_tracked(FEED));
        assert_eq!(tracker.seen_count(FEED), Some(0));

        // Everything after an empty baseline is new.
        let out = tracker.classify(FEED, entries(&["a"]));
        assert_eq!(new_guids(&out), ["a"]);
    }

    #[test]
    fn detects_appended_item_once() {
        let mut tracker = SeenTracker::new();
        tracker.classify(FEED, entries(&["a", "b"]));

        let out = tracker.classify(FEED, entries(&["a", "b", "c"]));
        assert_eq!(new_guids(&out), ["c"]);

        let out = tracker.classify(FEED, entries(&["a", "b", "c"]));
        assert!(new_guids(&out).is_empty());
    }

    #[test]
    fn identical_refetch_reports_nothing() {
        let mut tracker = SeenTracker::new();
        tracker.classify(FEED, entries(&["x", "y"]));
        let out = tracker.classify(FEED, entries(&["x", "y"]));
        assert!(new_guids(&out).is_empty());
        assert_eq!(tracker.seen_count(FEED), Some(2));
    }

    #[test]
    fn preserves_input_order() {
        let mut tracker = SeenTracker::new();
        tracker.classify(FEED, entries(&["b"]));
        let out = tracker.classify(FEED, entries(&["c", "b", "a"]));

        let order: Vec<&str> = out.iter().map(|c| c.entry.guid.as_str()).collect();
        assert_eq!(order, ["c", "b", "a"]);
        assert_eq!(new_guids(&out), ["c", "a"]);
    }

    #[test]
    fn duplicate_guid_in_one_fetch_is_new_only_once() {
        let mut tracker = SeenTracker::new();
        tracker.classify(FEED, entries(&["a"]));

        let out = tracker.classify(FEED, entries(&["n", "n"]));
        assert!(out[0].is_new);
        assert!(!out[1].is_new);
        assert_eq!(tracker.seen_count(FEED), Some(2));
    }

    #[test]
    fn vanished_items_stay_recorded() {
        let mut tracker = SeenTracker::new();
        tracker.classify(FEED, entries(&["a", "b"]));
        tracker.classify(FEED, entries(&["c"]));
        assert_eq!(tracker.seen_count(FEED), Some(3));

        // "a" coming back is not new.
        let out = tracker.classify(FEED, entries(&["a", "c"]));
        assert!(new_guids(&out).is_empty());
    }

    #[test]
    fn feeds_are_isolated() {
        let mut tracker = SeenTracker::new();
        let other = "https://other.example/rss";

        tracker.classify(FEED, entries(&["shared"]));
        tracker.classify(other, entries(&["unrelated"]));

        let out = tracker.classify(other, entries(&["unrelated", "shared"]));
        assert_eq!(new_guids(&out), ["shared"]);
        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.seen_count(FEED), Some(1));
    }

    #[test]
    fn guidless_items_collapse_to_one() {
        let mut tracker = SeenTracker::new();
        tracker.classify(FEED, entries(&["a"]));

        let out = tracker.classify(FEED, entries(&["", "", "b"]));
        assert_eq!(new_guids(&out), ["", "b"]);

        let out = tracker.classify(FEED, entries(&[""]));
        assert!(new_guids(&out).is_empty());
        assert!(tracker.state(FEED).unwrap().contains(""));
    }
}
