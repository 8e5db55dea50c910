use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use reqwest::Url;
use serde::Serialize;

use crate::error::{ConfigError, Result};

/// Classification of a failed schema fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FailureClass {
    /// Connection or I/O failure before a response was received.
    Transport,
    /// The server answered with a 5xx status.
    Server,
    /// The server answered with a 4xx or any other non-200, non-5xx status.
    Client,
    /// HTTP 200 whose body carries a GraphQL `errors` list.
    InBand,
}

impl FailureClass {
    /// Whether resubmitting the same request could produce a different outcome.
    pub fn is_transient(self) -> bool {
        matches!(self, Self::Transport | Self::Server)
    }
}

impl fmt::Display for FailureClass {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Transport => "TransportError",
            Self::Server => "ServerError",
            Self::Client => "ClientError",
            Self::InBand => "InBandError",
        };
        formatter.write_str(label)
    }
}

/// A validated, immutable description of one logical schema fetch.
///
/// A zero timeout means "no limit". `max_retries` counts retries after the
/// initial attempt, so a request is attempted at most `max_retries + 1` times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Absolute http(s) endpoint
    url: Url,
    /// Header name to value
    headers: BTreeMap<String, String>,
    /// Connection establishment timeout
    connect_timeout: Duration,
    /// Socket read timeout
    read_timeout: Duration,
    /// Retries allowed after the first attempt
    max_retries: u32,
    /// Linear backoff unit between attempts
    backoff_base: Duration,
}

impl FetchRequest {
    /// Creates a request for `url` with no headers, no timeouts and no retries.
    ///
    /// # Errors
    /// Returns an error if the URL is blank, relative, unparsable or not http(s).
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self {
            url: parse_endpoint(url)?,
            headers: BTreeMap::new(),
            connect_timeout: Duration::ZERO,
            read_timeout: Duration::ZERO,
            max_retries: 0,
            backoff_base: Duration::ZERO,
        })
    }

    /// Replaces the request headers.
    #[must_use]
    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the read timeout.
    #[must_use]
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Sets the number of retries allowed after the first attempt.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the linear backoff base.
    #[must_use]
    pub fn with_backoff_base(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    /// Endpoint URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Configured headers.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Header names only, for diagnostics that must not leak secrets.
    pub fn header_names(&self) -> Vec<String> {
        self.headers.keys().cloned().collect()
    }

    /// Connect timeout, zero meaning unlimited.
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Read timeout, zero meaning unlimited.
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Retries allowed after the first attempt.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Linear backoff base.
    pub fn backoff_base(&self) -> Duration {
        self.backoff_base
    }
}

/// Parses and checks a schema endpoint URL.
///
/// # Errors
/// Returns an error if the URL is blank, not absolute, or not http/https.
pub fn parse_endpoint(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingUrl);
    }

    let url = Url::parse(trimmed).map_err(|err| ConfigError::InvalidUrl {
        url: trimmed.to_owned(),
        reason: err.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme {
            url: trimmed.to_owned(),
            scheme: other.to_owned(),
        }),
    }
}
