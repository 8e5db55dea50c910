use std::io::Error as IoError;
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error;
use toml::de::Error as TomlError;

/// Result type for configuration handling.
pub type Result<T> = StdResult<T, ConfigError>;

/// Invalid target configuration, always detected before any network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The endpoint URL is missing or blank.
    #[error("Configuration error: 'url' must be provided and non-empty")]
    MissingUrl,

    /// The endpoint URL could not be parsed as an absolute URL.
    #[error("Configuration error: 'url' is not a valid absolute URL ({url}): {reason}")]
    InvalidUrl {
        /// The rejected URL
        url: String,
        /// Parser diagnostic
        reason: String,
    },

    /// The endpoint URL uses a scheme other than http or https.
    #[error("Configuration error: 'url' must use http:// or https://, got '{scheme}' in {url}")]
    UnsupportedScheme {
        /// The rejected URL
        url: String,
        /// The scheme that was found
        scheme: String,
    },

    /// A generated type name is not a valid identifier.
    #[error("Configuration error: '{field}' must be a valid identifier (e.g. MyApi), got '{value}'")]
    InvalidIdentifier {
        /// Configuration field name
        field: &'static str,
        /// The rejected value
        value: String,
    },

    /// The target package/namespace is not a dotted identifier path.
    #[error(
        "Configuration error: '{field}' must be a dotted namespace (e.g. com.example.api), got '{value}'"
    )]
    InvalidNamespace {
        /// Configuration field name
        field: &'static str,
        /// The rejected value
        value: String,
    },

    /// A timeout, retry or backoff value is negative.
    #[error("Configuration error: '{field}' must be >= 0, got {value}")]
    Negative {
        /// Configuration field name
        field: &'static str,
        /// The rejected value
        value: i64,
    },

    /// A numeric value does not fit the range the fetcher supports.
    #[error("Configuration error: '{field}' must be <= {max}, got {value}")]
    TooLarge {
        /// Configuration field name
        field: &'static str,
        /// The rejected value
        value: i64,
        /// Largest accepted value
        max: u64,
    },

    /// The configuration file lists no targets.
    #[error("Configuration error: no targets configured, provide at least one [[targets]] entry")]
    NoTargets,

    /// The configuration file could not be read.
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O failure
        source: IoError,
    },

    /// The configuration file is not valid TOML for the target schema.
    #[error("TOML deserialization error: {0}")]
    Toml(#[from] TomlError),
}
