//! Configuration loading.
//!
//! The configuration is a single YAML file read once at startup:
//!
//! ```yaml
//! feeds:
//!   - name: BBC News
//!     url: https://feeds.bbci.co.uk/news/rss.xml
//! interval_minutes: 10
//! fetch_timeout_seconds: 30   # optional
//! ```
//!
//! Any failure here is fatal; there is no reload after start.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{File, FileFormat, Value, ValueKind};
use serde::Deserialize;
use thiserror::Error;

/// Default location of the configuration file, relative to the working
/// directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Shortest wait between two cycles.  Configured intervals below this are
/// raised to it.
pub const MIN_INTERVAL_MINUTES: i64 = 1;

/// A named feed to poll.  Identity is the URL.
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
pub struct FeedDescriptor {
    pub name: String,
    pub url: String,
}

/// Application configuration.
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
pub struct Config {
    /// Feeds in polling order.  May be empty.
    #[serde(default)]
    pub feeds: Vec<FeedDescriptor>,

    /// Minutes between cycles, as written in the file.  Use
    /// [`Config::interval`] for the effective wait.
    pub interval_minutes: i64,

    /// Optional bound on each HTTP request.  Absent means no timeout.
    #[serde(default)]
    pub fetch_timeout_seconds: Option<u64>,
}

/// Errors that can occur while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file {} not found", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read configuration file {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed configuration in {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: config::ConfigError,
    },
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ConfigErrorKind {
    NotFound,
    Unreadable,
    Malformed,
}

impl ConfigError {
    pub fn kind(&self) -> ConfigErrorKind {
        match self {
            Self::NotFound { .. } => ConfigErrorKind::NotFound,
            Self::Unreadable { .. } => ConfigErrorKind::Unreadable,
            Self::Malformed { .. } => ConfigErrorKind::Malformed,
        }
    }
}

impl Config {
    /// Parse a configuration from YAML text.
    ///
    /// `path` is only used to label errors.
    pub fn from_yaml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        config::Config::builder()
            .add_source(File::from_str(text, FileFormat::Yaml))
            .build()
            .and_then(|raw| {
                check_types(&raw)?;
                raw.try_deserialize()
            })
            .map_err(|source| ConfigError::Malformed {
                path: path.to_path_buf(),
                source,
            })
    }

    /// The effective wait between two cycles.
    ///
    /// Values below [`MIN_INTERVAL_MINUTES`] are raised to it so a zero or
    /// negative setting cannot turn the poll loop into a busy loop.
    pub fn interval(&self) -> Duration {
        let minutes = self.interval_minutes.max(MIN_INTERVAL_MINUTES);
        // `minutes` is positive here.
        Duration::from_secs(minutes.unsigned_abs().saturating_mul(60))
    }

    /// Whether [`Config::interval`] had to raise the configured value.
    pub fn interval_clamped(&self) -> bool {
        self.interval_minutes < MIN_INTERVAL_MINUTES
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_seconds.map(Duration::from_secs)
    }
}

// The `config` crate converts scalars into whatever type serde asks for
// (`2.7` and `true` both become integers, `42` becomes a string), so the
// raw value kinds are checked before deserializing.
fn check_types(raw: &config::Config) -> Result<(), config::ConfigError> {
    for key in ["interval_minutes", "fetch_timeout_seconds"] {
        if let Some(value) = lookup(raw, key)? {
            expect_kind(key, &value.kind, "integer", is_integer)?;
        }
    }

    let Some(feeds) = lookup(raw, "feeds")? else {
        return Ok(());
    };
    let feeds = match feeds.kind {
        ValueKind::Array(feeds) => feeds,
        other => return Err(mismatch("feeds", "list", &other)),
    };
    for (i, feed) in feeds.into_iter().enumerate() {
        let fields = match feed.kind {
            ValueKind::Table(fields) => fields,
            other => return Err(mismatch(&format!("feeds[{i}]"), "map", &other)),
        };
        for field in ["name", "url"] {
            if let Some(value) = fields.get(field) {
                expect_kind(&format!("feeds[{i}].{field}"), &value.kind, "string", |kind| {
                    matches!(kind, ValueKind::String(_))
                })?;
            }
        }
    }
    Ok(())
}

/// `Ok(None)` when `key` is absent; serde reports missing required keys.
fn lookup(raw: &config::Config, key: &str) -> Result<Option<Value>, config::ConfigError> {
    match raw.get::<Value>(key) {
        Ok(value) => Ok(Some(value)),
        Err(config::ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

fn is_integer(kind: &ValueKind) -> bool {
    matches!(
        kind,
        ValueKind::I64(_) | ValueKind::I128(_) | ValueKind::U64(_) | ValueKind::U128(_)
    )
}

fn expect_kind(
    key: &str,
    kind: &ValueKind,
    expected: &str,
    accept: impl Fn(&ValueKind) -> bool,
) -> Result<(), config::ConfigError> {
    if accept(kind) {
        Ok(())
    } else {
        Err(mismatch(key, expected, kind))
    }
}

fn mismatch(key: &str, expected: &str, found: &ValueKind) -> config::ConfigError {
    let found = match found {
        ValueKind::Nil => "null",
        ValueKind::Boolean(_) => "boolean",
        ValueKind::I64(_) | ValueKind::I128(_) | ValueKind::U64(_) | ValueKind::U128(_) => {
            "integer"
        }
        ValueKind::Float(_) => "float",
        ValueKind::String(_) => "string",
        ValueKind::Table(_) => "map",
        ValueKind::Array(_) => "list",
    };
    config::ConfigError::Message(format!("`{key}` must be a {expected}, found a {found}"))
}

/// Read and parse the configuration file at `path`.
pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ConfigError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        },
    })?;

    Config::from_yaml(&text, path)
}
