use std::collections::BTreeMap;
use std::result::Result as StdResult;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use schemagen_core::FetchRequest;
use thiserror::Error;

use crate::error::{FetchError, Result};

/// Content type sent with every introspection request.
pub const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body decoded as UTF-8
    pub body: String,
}

/// An HTTP exchange that did not produce a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportFailure {
    /// Human-readable cause
    pub message: String,
}

impl TransportFailure {
    /// Creates a failure with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportFailure {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            "timed out"
        } else if err.is_connect() {
            "connection failed"
        } else {
            "request failed"
        };
        Self::new(format!("{kind}: {err}"))
    }
}

/// One HTTP POST per call. Implementations must release any connection
/// before returning or when the returned future is dropped.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Posts `body` to `url` with the JSON content type plus `headers`.
    ///
    /// # Errors
    /// Returns a [`TransportFailure`] when no HTTP response was received.
    async fn post(
        &self,
        url: &Url,
        headers: &BTreeMap<String, String>,
        body: &str,
    ) -> TransportResult;
}

/// Result of a single transport exchange.
pub type TransportResult = StdResult<TransportResponse, TransportFailure>;

/// [`HttpTransport`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    /// Shared connection pool
    client: Client,
}

impl ReqwestTransport {
    /// Wraps an existing client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client honoring the request's timeouts. Zero means no limit.
    ///
    /// # Errors
    /// Returns an error if the TLS backend or client cannot be initialized.
    pub fn for_request(request: &FetchRequest) -> Result<Self> {
        let mut builder = Client::builder();
        if !request.connect_timeout().is_zero() {
            builder = builder.connect_timeout(request.connect_timeout());
        }
        if !request.read_timeout().is_zero() {
            builder = builder.read_timeout(request.read_timeout());
        }

        let client = builder.build().map_err(FetchError::ClientBuild)?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(
        &self,
        url: &Url,
        headers: &BTreeMap<String, String>,
        body: &str,
    ) -> TransportResult {
        let mut builder = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE);
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.body(body.to_owned()).send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        Ok(TransportResponse { status, body: text })
    }
}
