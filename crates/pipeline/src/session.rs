// Per-invocation pipeline context.
//
// A `Session` bundles the remote collaborators, the notes title, and the
// status log for one run. It owns no global state; two sessions never share
// anything except the remote services themselves.

use serde::Serialize;
use tracing::info;

use notemaker_common::batch::compile;
use notemaker_common::extract::extract;
use notemaker_common::types::DocumentHandle;

use crate::config::NotemakerConfig;
use crate::error::PipelineError;
use crate::locate::locate;
use crate::remote::{DocumentDirectory, DocumentEditor, PageFetcher};
use crate::resolve::{resolve, Resolution};
use crate::status::StatusLog;
use crate::submit::submit;

/// Result of a successful append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppendReport {
    pub document: DocumentHandle,
    /// Whether the document was created by this run.
    pub created: bool,
    /// Recognized elements found on the page.
    pub elements: usize,
    /// Edit operations submitted (zero when nothing was recognized).
    pub operations: usize,
}

pub struct Session<'a> {
    directory: &'a dyn DocumentDirectory,
    editor: &'a dyn DocumentEditor,
    fetcher: &'a dyn PageFetcher,
    log: &'a dyn StatusLog,
    title: String,
    page_size: u32,
    resolved: Option<DocumentHandle>,
}

impl<'a> Session<'a> {
    pub fn new(
        directory: &'a dyn DocumentDirectory,
        editor: &'a dyn DocumentEditor,
        fetcher: &'a dyn PageFetcher,
        log: &'a dyn StatusLog,
        config: &NotemakerConfig,
    ) -> Self {
        Self {
            directory,
            editor,
            fetcher,
            log,
            title: config.doc_title.clone(),
            page_size: config.page_size,
            resolved: None,
        }
    }

    fn status(&self, line: &str) {
        info!(target: "notemaker::status", "{line}");
        self.log.append(line);
    }

    fn fail<T>(&self, error: PipelineError) -> Result<T, PipelineError> {
        self.status(&error.status_line());
        Err(error)
    }

    /// List every live document carrying the notes title.
    pub async fn find_documents(&self) -> Result<Vec<DocumentHandle>, PipelineError> {
        let documents = match locate(self.directory, &self.title, self.page_size).await {
            Ok(documents) => documents,
            Err(error) => return self.fail(error),
        };

        if documents.is_empty() {
            self.status("No matching documents found.");
        } else {
            self.status("Matching documents:");
            for (i, doc) in documents.iter().enumerate() {
                self.status(&format!("Document {i}: {doc}"));
            }
        }
        Ok(documents)
    }

    /// Resolve the notes document, creating it if needed.
    ///
    /// The handle is kept for the rest of the session, so later calls neither
    /// list nor create again.
    pub async fn resolve_document(&mut self) -> Result<Resolution, PipelineError> {
        if let Some(handle) = &self.resolved {
            return Ok(Resolution::Adopted(handle.clone()));
        }
        match resolve(self.directory, &self.title, self.page_size).await {
            Ok(resolution) => {
                self.report_resolution(&resolution);
                self.resolved = Some(resolution.handle().clone());
                Ok(resolution)
            }
            Err(error) => self.fail(error),
        }
    }

    fn report_resolution(&self, resolution: &Resolution) {
        let line = match resolution {
            Resolution::Created(doc) => {
                format!("Document \"{}\" created with ID {}.", doc.title, doc.id)
            }
            Resolution::Adopted(doc) => format!("Using document {doc}."),
        };
        self.status(&line);
    }

    /// Fetch `url`, extract its recognized elements, and append them to the
    /// notes document in one batch.
    ///
    /// Resolution and the page fetch run concurrently; extraction needs only
    /// the page, submission needs both. Both are driven to completion so a
    /// document created here is recorded even when the fetch fails.
    pub async fn append_from_url(&mut self, url: &str) -> Result<AppendReport, PipelineError> {
        let cached = self.resolved.clone();
        let (resolved, fetched) = tokio::join!(
            resolve_cached(self.directory, cached, &self.title, self.page_size),
            fetch_html(self.fetcher, url),
        );

        let resolution = match resolved {
            Ok(resolution) => resolution,
            Err(error) => return self.fail(error),
        };
        if self.resolved.is_none() {
            self.report_resolution(&resolution);
            self.resolved = Some(resolution.handle().clone());
        }
        let html = match fetched {
            Ok(html) => html,
            Err(error) => return self.fail(error),
        };

        let created = resolution.was_created();
        let document = resolution.into_handle();

        let elements = extract(&html);
        let operations = compile(&elements);
        if let Err(error) = submit(self.editor, &document.id, &operations).await {
            return self.fail(error);
        }

        if elements.is_empty() {
            self.status(&format!("Nothing to append from {url}."));
        } else {
            self.status(&format!(
                "Appended {} element(s) to document {}.",
                elements.len(),
                document.id
            ));
        }

        Ok(AppendReport { document, created, elements: elements.len(), operations: operations.len() })
    }
}

async fn resolve_cached(
    directory: &dyn DocumentDirectory,
    cached: Option<DocumentHandle>,
    title: &str,
    page_size: u32,
) -> Result<Resolution, PipelineError> {
    match cached {
        Some(handle) => Ok(Resolution::Adopted(handle)),
        None => resolve(directory, title, page_size).await,
    }
}

async fn fetch_html(fetcher: &dyn PageFetcher, url: &str) -> Result<String, PipelineError> {
    fetcher
        .fetch(url)
        .await
        .map_err(|source| PipelineError::FetchFailure { url: url.to_string(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteError;
    use crate::remote::memory::{InMemoryBackend, StaticPages};
    use crate::status::MemoryLog;

    const PAGE: &str = "https://blog.test/post";
    const ARTICLE: &str = "<h1>Title</h1><p>skip</p><strong>Key point</strong>";

    fn config() -> NotemakerConfig {
        NotemakerConfig { doc_title: "Notes".into(), ..NotemakerConfig::default() }
    }

    #[tokio::test]
    async fn append_creates_document_and_writes_content() {
        let backend = InMemoryBackend::new();
        let pages = StaticPages::new().with_page(PAGE, ARTICLE);
        let log = MemoryLog::new();
        let mut session = Session::new(&backend, &backend, &pages, &log, &config());

        let report = session.append_from_url(PAGE).await.unwrap();

        assert!(report.created);
        assert_eq!(report.elements, 2);
        assert_eq!(report.operations, 5);
        assert_eq!(backend.created().len(), 1);
        assert_eq!(backend.batches().len(), 1);
        assert_eq!(
            backend.body_text(&report.document.id).as_deref(),
            Some("Title\nKey point\n")
        );
        assert_eq!(
            log.lines(),
            vec![
                format!("Document \"Notes\" created with ID {}.", report.document.id),
                format!("Appended 2 element(s) to document {}.", report.document.id),
            ]
        );
    }

    #[tokio::test]
    async fn second_append_reuses_resolved_document() {
        let backend = InMemoryBackend::new().with_document("doc-1", "Notes");
        let pages = StaticPages::new().with_page(PAGE, "<h2>One</h2>");
        let log = MemoryLog::new();
        let mut session = Session::new(&backend, &backend, &pages, &log, &config());

        session.append_from_url(PAGE).await.unwrap();
        let report = session.append_from_url(PAGE).await.unwrap();

        assert!(!report.created);
        assert_eq!(backend.list_requests().len(), 1);
        assert_eq!(backend.batches().len(), 2);
        assert_eq!(backend.body_text("doc-1").as_deref(), Some("One\nOne\n"));
    }

    #[tokio::test]
    async fn page_without_recognized_elements_sends_nothing() {
        let backend = InMemoryBackend::new().with_document("doc-1", "Notes");
        let pages = StaticPages::new().with_page(PAGE, "<p>just prose</p>");
        let log = MemoryLog::new();
        let mut session = Session::new(&backend, &backend, &pages, &log, &config());

        let report = session.append_from_url(PAGE).await.unwrap();

        assert_eq!(report.operations, 0);
        assert!(backend.batches().is_empty());
        assert_eq!(log.lines().last().map(String::as_str), Some("Nothing to append from https://blog.test/post."));
    }

    #[tokio::test]
    async fn batch_rejection_logs_one_line_with_backend_message() {
        let backend = InMemoryBackend::new()
            .with_document("doc-1", "Notes")
            .fail_batches_with(RemoteError::Status {
                status: 400,
                message: "Invalid requests[1].updateTextStyle".into(),
            });
        let pages = StaticPages::new().with_page(PAGE, ARTICLE);
        let log = MemoryLog::new();
        let mut session = Session::new(&backend, &backend, &pages, &log, &config());
        let url = String::from(PAGE);

        let error = session.append_from_url(&url).await.unwrap_err();

        assert!(matches!(error, PipelineError::BatchUpdateFailure { .. }));
        assert_eq!(url, PAGE);
        let failures: Vec<_> = log.lines().into_iter().filter(|l| l.starts_with("Error")).collect();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].starts_with("Error (batch update): "));
        assert!(failures[0].contains("Invalid requests[1].updateTextStyle"));
    }

    #[tokio::test]
    async fn ambiguous_title_blocks_append() {
        let backend = InMemoryBackend::new()
            .with_document("doc-1", "Notes")
            .with_document("doc-2", "Notes");
        let pages = StaticPages::new().with_page(PAGE, ARTICLE);
        let log = MemoryLog::new();
        let mut session = Session::new(&backend, &backend, &pages, &log, &config());

        let error = session.append_from_url(PAGE).await.unwrap_err();

        assert_eq!(error.code(), "AMBIGUOUS_DOCUMENT");
        assert!(backend.created().is_empty());
        assert!(backend.batches().is_empty());
        assert_eq!(log.lines().len(), 1);
    }

    #[tokio::test]
    async fn unreachable_page_is_fetch_failure() {
        let backend = InMemoryBackend::new().with_document("doc-1", "Notes");
        let pages = StaticPages::new();
        let log = MemoryLog::new();
        let mut session = Session::new(&backend, &backend, &pages, &log, &config());

        let error = session.append_from_url(PAGE).await.unwrap_err();

        match &error {
            PipelineError::FetchFailure { url, source } => {
                assert_eq!(url, PAGE);
                assert_eq!(source.status(), Some(404));
            }
            other => panic!("expected fetch failure, got {other:?}"),
        }
        assert!(backend.batches().is_empty());
        assert_eq!(log.lines(), vec![error.status_line()]);
    }

    #[tokio::test]
    async fn document_created_before_fetch_failure_is_kept() {
        let backend = InMemoryBackend::new();
        let pages = StaticPages::new().with_page(PAGE, ARTICLE);
        let log = MemoryLog::new();
        let mut session = Session::new(&backend, &backend, &pages, &log, &config());

        let error = session.append_from_url("https://x.test/").await.unwrap_err();

        assert!(matches!(error, PipelineError::FetchFailure { .. }));
        let created = backend.created();
        assert_eq!(created.len(), 1);
        assert_eq!(
            log.lines(),
            vec![
                format!("Document \"Notes\" created with ID {}.", created[0].id),
                error.status_line(),
            ]
        );

        let report = session.append_from_url(PAGE).await.unwrap();
        assert!(!report.created);
        assert_eq!(report.document, created[0]);
        assert_eq!(backend.created().len(), 1);
        assert_eq!(backend.list_requests().len(), 1);
    }

    #[tokio::test]
    async fn find_lists_matches_numbered_from_zero() {
        let backend = InMemoryBackend::new()
            .with_document("a", "Notes")
            .with_document("b", "Notes")
            .with_document("c", "Other");
        let pages = StaticPages::new();
        let log = MemoryLog::new();
        let session = Session::new(&backend, &backend, &pages, &log, &config());

        let found = session.find_documents().await.unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(
            log.lines(),
            vec![
                "Matching documents:",
                "Document 0: \"Notes\" (a)",
                "Document 1: \"Notes\" (b)",
            ]
        );
        assert!(backend.created().is_empty());
    }

    #[tokio::test]
    async fn find_with_no_matches_says_so() {
        let backend = InMemoryBackend::new();
        let pages = StaticPages::new();
        let log = MemoryLog::new();
        let session = Session::new(&backend, &backend, &pages, &log, &config());

        assert!(session.find_documents().await.unwrap().is_empty());
        assert_eq!(log.lines(), vec!["No matching documents found."]);
    }

    #[tokio::test]
    async fn resolve_is_cached_for_the_session() {
        let backend = InMemoryBackend::new();
        let pages = StaticPages::new();
        let log = MemoryLog::new();
        let mut session = Session::new(&backend, &backend, &pages, &log, &config());

        let first = session.resolve_document().await.unwrap();
        let second = session.resolve_document().await.unwrap();

        assert!(first.was_created());
        assert_eq!(second.handle(), first.handle());
        assert_eq!(backend.created().len(), 1);
        assert_eq!(backend.list_requests().len(), 1);
        assert_eq!(log.lines().len(), 1);
    }
}
