//! Feed source abstraction layer.
//!
//! This module defines the [`FeedSource`] trait, the [`FetchError`] it fails
//! with, and the [`Entry`] / [`Feed`] types every source produces.  Concrete
//! implementations live in sub-modules (currently only [`rss`]).
//!
//! ## For contributors — adding a new source
//!
//! 1. Create a new file in this directory (e.g. `atom.rs`).
//! 2. Define a struct (e.g. `AtomSource`) and implement [`FeedSource`] for it.
//! 3. Add `mod atom;` below and re-export your struct in the `pub use` block.
//! 4. Construct it in `main.rs` instead of (or next to) `RssSource`.
//!
//! The tracker and the poll loop are source-agnostic.

mod entry;
mod rss;

pub use self::entry::{Entry, Feed};
pub use self::rss::RssSource;

use std::error::Error as StdError;

use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Why a single fetch failed.
///
/// Both kinds are recoverable: the poll loop logs them and moves on to the
/// next feed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The document could not be retrieved: connection failure, timeout, or
    /// a non-success HTTP status.
    #[error("failed to fetch {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: BoxError,
    },

    /// The body was retrieved but is not a readable feed document.
    #[error("failed to parse feed from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: BoxError,
    },
}

/// The two failure classes of [`FetchError`], without their payload.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FetchErrorKind {
    Network,
    Parse,
}

impl FetchError {
    pub fn network(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Network {
            url: url.into(),
            source: source.into(),
        }
    }

    pub fn parse(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Parse {
            url: url.into(),
            source: source.into(),
        }
    }

    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::Network { .. } => FetchErrorKind::Network,
            Self::Parse { .. } => FetchErrorKind::Parse,
        }
    }
}

/// Trait that every feed source must implement.
///
/// The poll loop calls [`fetch()`](FeedSource::fetch) once per configured
/// feed per cycle, strictly one call at a time.
///
/// ## Implementing a new source
///
/// ```ignore
/// pub struct MySource { /* client, settings */ }
///
/// impl FeedSource for MySource {
///     fn fetch(&self, url: &str) -> Result<Feed, FetchError> {
///         // Perform HTTP / IO, then convert into a Feed.
///         todo!()
///     }
/// }
/// ```
pub trait FeedSource {
    /// Retrieve the document at `url` and parse it into a [`Feed`].
    ///
    /// Every call re-fetches the full document; implementations must not
    /// retry internally.
    fn fetch(&self, url: &str) -> Result<Feed, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(
            FetchError::network("http://x", "refused").kind(),
            FetchErrorKind::Network
        );
        assert_eq!(
            FetchError::parse("http://x", "bad xml").kind(),
            FetchErrorKind::Parse
        );
    }

    #[test]
    fn display_names_url_and_cause() {
        let err = FetchError::network("http://example.com/rss", "connection refused");
        assert_eq!(
            err.to_string(),
            "failed to fetch http://example.com/rss: connection refused"
        );
    }

    #[test]
    fn source_is_exposed() {
        let err = FetchError::parse("http://x", "unexpected eof");
        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("unexpected eof"));
    }
}
