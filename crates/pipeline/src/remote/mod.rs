// Remote collaborators of the pipeline.
//
// The document directory, the document editor and the page fetcher are
// external services. They are reached through these traits so the pipeline
// can run against Google's HTTP APIs in production and against the
// in-memory backend in tests. Boxed futures keep the traits object safe.

pub mod fetch;
pub mod google;
pub mod memory;

use std::future::Future;
use std::pin::Pin;

use notemaker_common::types::{DocumentHandle, DocumentQuery, EditOperation, ListPage};

use crate::error::RemoteError;

pub type RemoteFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RemoteError>> + Send + 'a>>;

/// Searchable, paginated collection of documents.
pub trait DocumentDirectory: Send + Sync {
    /// Fetch one page of documents matching `query`.
    fn list<'a>(&'a self, query: &'a DocumentQuery) -> RemoteFuture<'a, ListPage>;

    /// Create an empty document; the directory allocates its id.
    fn create<'a>(&'a self, title: &'a str) -> RemoteFuture<'a, DocumentHandle>;
}

/// Applies edit batches to a document.
pub trait DocumentEditor: Send + Sync {
    /// Apply `operations` as one atomic batch. Each operation sees the
    /// document as left by the operations before it.
    fn batch_update<'a>(
        &'a self,
        document_id: &'a str,
        operations: &'a [EditOperation],
    ) -> RemoteFuture<'a, ()>;
}

/// Retrieves the raw HTML of an external page.
pub trait PageFetcher: Send + Sync {
    fn fetch<'a>(&'a self, url: &'a str) -> RemoteFuture<'a, String>;
}

/// Shared HTTP client setup for every remote that talks HTTP.
pub(crate) fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client, RemoteError> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .user_agent(concat!("notemaker/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|error| RemoteError::Transport(format!("failed to build http client: {error}")))
}
