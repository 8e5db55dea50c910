use std::result::Result as StdResult;

use schemagen_core::FailureClass;
use thiserror::Error;

/// Result alias for schema fetching.
pub type Result<T> = StdResult<T, FetchError>;

/// Final outcome of a failed schema fetch.
///
/// Network variants carry the endpoint, the number of attempts made and the
/// configured header names (never their values).
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection or I/O failure, retries exhausted
    #[error(
        "TransportError: request to '{url}' failed after {attempts} attempt(s): {message}, Headers(keys): [{}]",
        header_names.join(", ")
    )]
    Transport {
        /// Endpoint
        url: String,
        /// Attempts made
        attempts: u32,
        /// Underlying transport message
        message: String,
        /// Configured header names
        header_names: Vec<String>,
    },

    /// 5xx response, retries exhausted
    #[error(
        "ServerError: generation failed from provided URL '{url}' after {attempts} attempt(s). Status: {status}, Body: {body}, Headers(keys): [{}]",
        header_names.join(", ")
    )]
    Server {
        /// Endpoint
        url: String,
        /// Attempts made
        attempts: u32,
        /// HTTP status
        status: u16,
        /// Truncated response body
        body: String,
        /// Configured header names
        header_names: Vec<String>,
    },

    /// Non-200, non-5xx response
    #[error(
        "ClientError: generation failed from provided URL '{url}'. Status: {status}, Body: {body}, Headers(keys): [{}]",
        header_names.join(", ")
    )]
    Client {
        /// Endpoint
        url: String,
        /// Attempts made
        attempts: u32,
        /// HTTP status
        status: u16,
        /// Truncated response body
        body: String,
        /// Configured header names
        header_names: Vec<String>,
    },

    /// HTTP 200 carrying a GraphQL `errors` list
    #[error(
        "InBandError: GraphQL at '{url}' responded with errors. Status: 200, {details}, Headers(keys): [{}]",
        header_names.join(", ")
    )]
    InBand {
        /// Endpoint
        url: String,
        /// Attempts made
        attempts: u32,
        /// Structured error summary or truncated body snippet
        details: String,
        /// Configured header names
        header_names: Vec<String>,
    },

    /// Cancelled while an attempt or a backoff sleep was in flight
    #[error("Schema fetch from '{url}' cancelled during attempt {attempts}")]
    Cancelled {
        /// Endpoint
        url: String,
        /// Attempt in progress when cancelled
        attempts: u32,
    },

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl FetchError {
    /// Failure class of a network outcome, `None` for cancellation and client setup.
    pub fn class(&self) -> Option<FailureClass> {
        match self {
            Self::Transport { .. } => Some(FailureClass::Transport),
            Self::Server { .. } => Some(FailureClass::Server),
            Self::Client { .. } => Some(FailureClass::Client),
            Self::InBand { .. } => Some(FailureClass::InBand),
            Self::Cancelled { .. } | Self::ClientBuild(_) => None,
        }
    }

    /// Number of HTTP attempts made before this error was returned.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Transport { attempts, .. }
            | Self::Server { attempts, .. }
            | Self::Client { attempts, .. }
            | Self::InBand { attempts, .. }
            | Self::Cancelled { attempts, .. } => *attempts,
            Self::ClientBuild(_) => 0,
        }
    }

    /// Whether a fresh fetch could succeed where this one failed.
    pub fn is_retryable(&self) -> bool {
        self.class().is_some_and(FailureClass::is_transient)
    }
}
