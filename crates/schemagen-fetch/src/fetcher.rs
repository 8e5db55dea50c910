use std::fmt::Write as _;

use schemagen_core::FetchRequest;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{FetchError, Result};
use crate::introspection::INTROSPECTION_QUERY;
use crate::retry::{RetryPolicy, sleep_with_cancel};
use crate::transport::{HttpTransport, ReqwestTransport, TransportResult};

/// Maximum number of body characters kept in diagnostics.
const MAX_SNIPPET_CHARS: usize = 512;
/// Maximum number of GraphQL error entries summarized in an in-band error.
const MAX_REPORTED_ERRORS: usize = 5;

/// Executes introspection fetches over an [`HttpTransport`].
///
/// The fetcher holds no per-call state, so one instance can serve any
/// number of concurrent fetches.
#[derive(Debug, Clone)]
pub struct SchemaFetcher<T> {
    /// HTTP layer
    transport: T,
    /// Request body posted on every attempt
    payload: String,
}

impl<T: HttpTransport> SchemaFetcher<T> {
    /// Creates a fetcher posting the standard introspection query.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            payload: INTROSPECTION_QUERY.to_owned(),
        }
    }

    /// Replaces the request body posted to the endpoint.
    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches the raw introspection body for `request`.
    ///
    /// Transport and 5xx failures are retried according to the request's
    /// retry budget with a linear backoff. Only the final outcome is returned.
    ///
    /// # Errors
    /// Returns the classified failure of the last attempt, or
    /// [`FetchError::Cancelled`] if `cancel` fires during an attempt or a
    /// backoff sleep.
    pub async fn fetch(&self, request: &FetchRequest, cancel: &CancellationToken) -> Result<String> {
        let policy = RetryPolicy::from_request(request);
        let mut attempt: u32 = 1;

        loop {
            debug!(
                "Fetching schema from {} (attempt {attempt}/{})",
                request.url(),
                policy.max_attempts()
            );

            let exchange = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(cancelled(request, attempt)),
                exchange = self.transport.post(request.url(), request.headers(), &self.payload) => exchange,
            };

            let failure = match classify(request, attempt, exchange) {
                Ok(body) => {
                    info!(
                        "Fetched schema from {} in {attempt} attempt(s)",
                        request.url()
                    );
                    return Ok(body);
                }
                Err(failure) => failure,
            };

            let Some(class) = failure.class() else {
                return Err(failure);
            };
            if !policy.allows_retry(attempt, class) {
                return Err(failure);
            }
            let Some(next_attempt) = attempt.checked_add(1) else {
                return Err(failure);
            };

            let delay = policy.backoff(attempt);
            warn!(
                "Attempt {attempt} against {} failed with {class}, retrying in {delay:?}",
                request.url()
            );
            if !sleep_with_cancel(delay, cancel).await {
                return Err(cancelled(request, attempt));
            }
            attempt = next_attempt;
        }
    }
}

/// Fetches a schema with a [`ReqwestTransport`] configured from `request`.
///
/// # Errors
/// Returns an error if the client cannot be built or the fetch fails.
pub async fn fetch_schema(request: &FetchRequest, cancel: &CancellationToken) -> Result<String> {
    let transport = ReqwestTransport::for_request(request)?;
    SchemaFetcher::new(transport).fetch(request, cancel).await
}

fn cancelled(request: &FetchRequest, attempt: u32) -> FetchError {
    FetchError::Cancelled {
        url: request.url().to_string(),
        attempts: attempt,
    }
}

/// Maps one exchange to a success body or a classified failure.
fn classify(request: &FetchRequest, attempt: u32, exchange: TransportResult) -> Result<String> {
    let url = request.url().to_string();
    let header_names = request.header_names();

    let response = match exchange {
        Ok(response) => response,
        Err(failure) => {
            return Err(FetchError::Transport {
                url,
                attempts: attempt,
                message: failure.message,
                header_names,
            });
        }
    };

    match response.status {
        200 => match find_in_band_errors(&response.body) {
            Some(details) => Err(FetchError::InBand {
                url,
                attempts: attempt,
                details,
                header_names,
            }),
            None => Ok(response.body),
        },
        500..=599 => Err(FetchError::Server {
            url,
            attempts: attempt,
            status: response.status,
            body: truncate(&response.body),
            header_names,
        }),
        status => Err(FetchError::Client {
            url,
            attempts: attempt,
            status,
            body: truncate(&response.body),
            header_names,
        }),
    }
}

/// Looks for a top-level, non-empty GraphQL `errors` array.
///
/// When the body is not valid JSON, any occurrence of the literal `"errors"`
/// counts as an in-band error. That fallback can misfire on unparsable
/// documents that merely mention the token.
fn find_in_band_errors(body: &str) -> Option<String> {
    match serde_json::from_str::<Value>(body) {
        Ok(document) => {
            let entries = document.get("errors")?.as_array()?;
            (!entries.is_empty()).then(|| summarize_errors(entries))
        }
        Err(_) => body
            .contains("\"errors\"")
            .then(|| format!("Body snippet: {}", truncate(body))),
    }
}

fn summarize_errors(entries: &[Value]) -> String {
    let mut summary = String::from("Errors: ");
    for (index, entry) in entries.iter().take(MAX_REPORTED_ERRORS).enumerate() {
        let message = entry.get("message").map_or_else(
            || entry.to_string(),
            |value| value.as_str().map_or_else(|| value.to_string(), str::to_owned),
        );
        let path = entry
            .get("path")
            .map_or_else(|| "[]".to_owned(), Value::to_string);
        let _written = write!(summary, "#{} message={message} path={path}; ", index + 1);
    }
    summary
}

/// Cuts `text` to [`MAX_SNIPPET_CHARS`] characters, appending `...` when cut.
fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_SNIPPET_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}
