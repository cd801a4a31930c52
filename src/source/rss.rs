//! RSS feed source implementation.
//!
//! Fetches a document over HTTP(S) with a blocking [`reqwest`] client and
//! parses it as RSS 2.0 using the [`rss`] crate.

use std::time::Duration;

use tracing::debug;

use super::{Entry, Feed, FeedSource, FetchError};

/// An RSS 2.0 feed source.
pub struct RssSource {
    client: reqwest::blocking::Client,
}

impl RssSource {
    /// Create a new RSS source.
    ///
    /// `timeout` bounds each request end to end.  `None` leaves requests
    /// unbounded, so a hanging server stalls the poll loop until it answers.
    pub fn new(timeout: Option<Duration>) -> reqwest::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Convert an already-parsed [`rss::Channel`] into a [`Feed`].
    ///
    /// This is a pure function (no I/O) so that tests can exercise the
    /// mapping without hitting the network.
    pub fn parse_channel(channel: &rss::Channel) -> Feed {
        let entries = channel
            .items()
            .iter()
            .map(|item| Entry {
                title: item.title().unwrap_or_default().to_string(),
                link: item.link().unwrap_or_default().to_string(),
                description: item.description().unwrap_or_default().to_string(),
                published_at: item.pub_date().unwrap_or_default().to_string(),
                guid: item
                    .guid()
                    .map(|g| g.value().to_string())
                    .unwrap_or_default(),
            })
            .collect();

        Feed {
            title: channel.title().to_string(),
            link: channel.link().to_string(),
            description: channel.description().to_string(),
            entries,
        }
    }
}

impl FeedSource for RssSource {
    fn fetch(&self, url: &str) -> Result<Feed, FetchError> {
        let body = self
            .client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.bytes())
            .map_err(|e| FetchError::network(url, e))?;

        debug!(url, bytes = body.len(), "downloaded feed document");

        let channel =
            rss::Channel::read_from(body.as_ref()).map_err(|e| FetchError::parse(url, e))?;
        Ok(Self::parse_channel(&channel))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
