//! The data types produced by every feed source.
//!
//! A [`Feed`] is one fetched snapshot of a remote document: the channel
//! metadata plus its [`Entry`] list in document order.  The tracker and the
//! poll loop only ever see these types, never the wire format.

use chrono::{DateTime, Utc};

/// A single item parsed from a feed fetch.
///
/// Every field is a plain string.  Fields missing from the source document
/// are empty rather than absent, so one sparse item never fails the parse.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Entry {
    /// Headline.
    pub title: String,

    /// URL of the full content.
    pub link: String,

    /// Summary text, often HTML.
    pub description: String,

    /// Publication date in the feed's own format (RFC 2822 for RSS).
    ///
    /// Kept verbatim; see [`Entry::published`] for a parsed view.
    pub published_at: String,

    /// Identifier used for change detection.
    ///
    /// Empty when the item has no `<guid>`.  All guid-less items of a feed
    /// therefore share the identifier `""` and are tracked as one item.
    pub guid: String,
}

impl Entry {
    /// The publication date parsed as RFC 2822, if it parses.
    pub fn published(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc2822(self.published_at.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// One fetched snapshot of a feed document.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Feed {
    pub title: String,
    pub link: String,
    pub description: String,
    /// Items in document order.
    pub entries: Vec<Entry>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
