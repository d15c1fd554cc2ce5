// In-memory directory, editor and page source.
//
// Mirrors the remote services closely enough to exercise the whole pipeline
// without a network: paginated listing with opaque cursors, trashed flags,
// atomic batches applied to a `BodyModel`, and injectable failures. Every
// request is recorded so tests can assert on call counts and order.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use notemaker_common::batch::BodyModel;
use notemaker_common::types::{DocumentHandle, DocumentQuery, EditOperation, ListPage};
use uuid::Uuid;

use super::{DocumentDirectory, DocumentEditor, PageFetcher, RemoteFuture};
use crate::error::RemoteError;

const PAGE_TOKEN_PREFIX: &str = "offset:";

#[derive(Debug)]
struct StoredDocument {
    handle: DocumentHandle,
    trashed: bool,
    body: BodyModel,
}

#[derive(Debug, Default)]
struct BackendState {
    documents: Vec<StoredDocument>,
    list_requests: Vec<DocumentQuery>,
    created: Vec<DocumentHandle>,
    batches: Vec<(String, Vec<EditOperation>)>,
    fail_list_on_request: Option<usize>,
    fail_create: Option<RemoteError>,
    fail_batch: Option<RemoteError>,
}

/// A document directory and editor held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    state: Mutex<BackendState>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed a document with an empty body.
    pub fn with_document(self, id: &str, title: &str) -> Self {
        self.insert(id, title, false);
        self
    }

    /// Seed a trashed document; listing must never return it.
    pub fn with_trashed_document(self, id: &str, title: &str) -> Self {
        self.insert(id, title, true);
        self
    }

    /// Fail the `n`th list request (0-based) with a server error.
    pub fn fail_list_on_request(self, n: usize) -> Self {
        self.state().fail_list_on_request = Some(n);
        self
    }

    pub fn fail_create_with(self, error: RemoteError) -> Self {
        self.state().fail_create = Some(error);
        self
    }

    pub fn fail_batches_with(self, error: RemoteError) -> Self {
        self.state().fail_batch = Some(error);
        self
    }

    fn insert(&self, id: &str, title: &str, trashed: bool) {
        self.state().documents.push(StoredDocument {
            handle: DocumentHandle::new(id, title),
            trashed,
            body: BodyModel::new(),
        });
    }

    /// Every list request received, in order.
    pub fn list_requests(&self) -> Vec<DocumentQuery> {
        self.state().list_requests.clone()
    }

    /// Every document created through the directory, in order.
    pub fn created(&self) -> Vec<DocumentHandle> {
        self.state().created.clone()
    }

    /// Every batch received (including rejected ones), in order.
    pub fn batches(&self) -> Vec<(String, Vec<EditOperation>)> {
        self.state().batches.clone()
    }

    /// Current body text of a document, without its terminating newline.
    pub fn body_text(&self, document_id: &str) -> Option<String> {
        self.state()
            .documents
            .iter()
            .find(|doc| doc.handle.id == document_id)
            .map(|doc| doc.body.body_text())
    }
}

impl DocumentDirectory for InMemoryBackend {
    fn list<'a>(&'a self, query: &'a DocumentQuery) -> RemoteFuture<'a, ListPage> {
        Box::pin(async move {
            let mut state = self.state();
            let request_number = state.list_requests.len();
            state.list_requests.push(query.clone());
            if state.fail_list_on_request == Some(request_number) {
                return Err(RemoteError::Status {
                    status: 500,
                    message: "backend error while listing".into(),
                });
            }

            let offset = match &query.page_token {
                None => 0,
                Some(token) => token
                    .strip_prefix(PAGE_TOKEN_PREFIX)
                    .and_then(|offset| offset.parse::<usize>().ok())
                    .ok_or_else(|| RemoteError::Status {
                        status: 400,
                        message: format!("invalid page token `{token}`"),
                    })?,
            };

            let matching: Vec<DocumentHandle> = state
                .documents
                .iter()
                .filter(|doc| doc.handle.title == query.title_exact)
                .filter(|doc| !(query.exclude_trashed && doc.trashed))
                .map(|doc| doc.handle.clone())
                .collect();

            let page_size = query.page_size.max(1) as usize;
            let end = (offset + page_size).min(matching.len());
            let files = matching.get(offset..end).map(<[_]>::to_vec).unwrap_or_default();
            let next_page_token =
                (end < matching.len()).then(|| format!("{PAGE_TOKEN_PREFIX}{end}"));

            Ok(ListPage { files, next_page_token })
        })
    }

    fn create<'a>(&'a self, title: &'a str) -> RemoteFuture<'a, DocumentHandle> {
        Box::pin(async move {
            let mut state = self.state();
            if let Some(error) = state.fail_create.clone() {
                return Err(error);
            }
            let handle = DocumentHandle::new(Uuid::new_v4().simple().to_string(), title);
            state.documents.push(StoredDocument {
                handle: handle.clone(),
                trashed: false,
                body: BodyModel::new(),
            });
            state.created.push(handle.clone());
            Ok(handle)
        })
    }
}

impl DocumentEditor for InMemoryBackend {
    fn batch_update<'a>(
        &'a self,
        document_id: &'a str,
        operations: &'a [EditOperation],
    ) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            let mut state = self.state();
            state.batches.push((document_id.to_string(), operations.to_vec()));
            if let Some(error) = state.fail_batch.clone() {
                return Err(error);
            }

            let document = state
                .documents
                .iter_mut()
                .find(|doc| doc.handle.id == document_id)
                .ok_or_else(|| RemoteError::Status {
                    status: 404,
                    message: format!("Requested entity was not found: {document_id}"),
                })?;

            document
                .body
                .apply_batch(operations)
                .map_err(|error| RemoteError::Status { status: 400, message: error.to_string() })
        })
    }
}

/// Serves fixed HTML by URL; unknown URLs answer 404.
#[derive(Debug, Default)]
pub struct StaticPages {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl StaticPages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl PageFetcher for StaticPages {
    fn fetch<'a>(&'a self, url: &'a str) -> RemoteFuture<'a, String> {
        Box::pin(async move {
            self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| RemoteError::Status {
                status: 404,
                message: format!("no page at {url}"),
            })
        })
    }
}
