use async_trait::async_trait;
use schemagen_core::FetchRequest;
use schemagen_fetch::{HttpTransport, Result, SchemaFetcher, fetch_schema};
use tokio_util::sync::CancellationToken;

/// Supplies the raw introspection body for a request.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// Fetches the schema described by `request`.
    ///
    /// # Errors
    /// Returns the classified fetch failure.
    async fn load_schema(&self, request: &FetchRequest, cancel: &CancellationToken) -> Result<String>;
}

/// Fetches over HTTP with a client configured per request, so each
/// target's timeouts apply.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpSchemaSource;

#[async_trait]
impl SchemaSource for HttpSchemaSource {
    async fn load_schema(&self, request: &FetchRequest, cancel: &CancellationToken) -> Result<String> {
        fetch_schema(request, cancel).await
    }
}

#[async_trait]
impl<T: HttpTransport> SchemaSource for SchemaFetcher<T> {
    async fn load_schema(&self, request: &FetchRequest, cancel: &CancellationToken) -> Result<String> {
        self.fetch(request, cancel).await
    }
}
