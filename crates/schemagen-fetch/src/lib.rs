//! Resilient retrieval of GraphQL introspection schemas.
//!
//! A [`SchemaFetcher`] performs one logical fetch per [`FetchRequest`], retrying
//! transport and server failures with a linear backoff and surfacing client
//! and in-band GraphQL errors immediately. The HTTP layer sits behind the
//! [`HttpTransport`] trait; [`ReqwestTransport`] is the production
//! implementation.
//!
//! [`FetchRequest`]: schemagen_core::FetchRequest
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::missing_panics_doc,
        reason = "Allow for tests"
    )
)]

/// Fetch error types.
pub mod error;
/// Schema fetch loop and response classification.
pub mod fetcher;
/// Introspection query payload.
pub mod introspection;
/// Retry decisions and cancellable backoff.
pub mod retry;
/// HTTP transport boundary.
pub mod transport;

pub use error::{FetchError, Result};
pub use fetcher::{SchemaFetcher, fetch_schema};
pub use introspection::INTROSPECTION_QUERY;
pub use retry::{RetryPolicy, delay_for, should_retry, sleep_with_cancel};
pub use transport::{
    HttpTransport, JSON_CONTENT_TYPE, ReqwestTransport, TransportFailure, TransportResponse,
    TransportResult,
};
