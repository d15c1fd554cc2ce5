// Document Resolver: enforce "at most one notes document".
//
//   0 matches  → create one
//   1 match    → adopt it unchanged
//   2+ matches → refuse; never pick, merge or delete

use serde::Serialize;
use tracing::{info, warn};

use notemaker_common::types::DocumentHandle;

use crate::error::PipelineError;
use crate::locate::locate;
use crate::remote::DocumentDirectory;

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "document", rename_all = "snake_case")]
pub enum Resolution {
    /// No document existed; this one was just created.
    Created(DocumentHandle),
    /// Exactly one document existed and is used as-is.
    Adopted(DocumentHandle),
}

impl Resolution {
    pub fn handle(&self) -> &DocumentHandle {
        match self {
            Self::Created(handle) | Self::Adopted(handle) => handle,
        }
    }

    pub fn into_handle(self) -> DocumentHandle {
        match self {
            Self::Created(handle) | Self::Adopted(handle) => handle,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Find the single document titled `title`, creating it if none exists.
///
/// Creation is a side effect: resolving twice when no document exists
/// creates two documents unless the caller keeps the first result.
pub async fn resolve(
    directory: &dyn DocumentDirectory,
    title: &str,
    page_size: u32,
) -> Result<Resolution, PipelineError> {
    let mut candidates = locate(directory, title, page_size).await?;

    match candidates.len() {
        0 => {
            let handle = directory.create(title).await.map_err(PipelineError::CreateFailure)?;
            info!(document_id = %handle.id, title, "created notes document");
            Ok(Resolution::Created(handle))
        }
        1 => {
            let handle = candidates.remove(0);
            info!(document_id = %handle.id, title, "using existing notes document");
            Ok(Resolution::Adopted(handle))
        }
        count => {
            warn!(count, title, "refusing to choose between duplicate notes documents");
            Err(PipelineError::AmbiguousDocument { title: title.to_string(), candidates })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteError;
    use crate::remote::memory::InMemoryBackend;

    #[tokio::test]
    async fn creates_exactly_once_when_absent() {
        let backend = InMemoryBackend::new().with_trashed_document("trashed", "Notes");
        let resolution = resolve(&backend, "Notes", 10).await.unwrap();

        assert!(resolution.was_created());
        let created = backend.created();
        assert_eq!(created.len(), 1);
        assert_eq!(resolution.handle(), &created[0]);
        assert_eq!(resolution.handle().title, "Notes");
        assert_ne!(resolution.handle().id, "trashed");
    }

    #[tokio::test]
    async fn adopts_single_match_without_creating() {
        let backend = InMemoryBackend::new().with_document("doc-1", "Notes");
        let resolution = resolve(&backend, "Notes", 10).await.unwrap();

        assert_eq!(resolution, Resolution::Adopted(DocumentHandle::new("doc-1", "Notes")));
        assert!(backend.created().is_empty());
    }

    #[tokio::test]
    async fn refuses_duplicates_and_reports_all_candidates() {
        let backend = InMemoryBackend::new()
            .with_document("doc-1", "Notes")
            .with_document("doc-2", "Notes")
            .with_document("doc-3", "Notes");
        let error = resolve(&backend, "Notes", 2).await.unwrap_err();

        match error {
            PipelineError::AmbiguousDocument { title, candidates } => {
                assert_eq!(title, "Notes");
                let ids: Vec<_> = candidates.iter().map(|c| c.id.as_str()).collect();
                assert_eq!(ids, vec!["doc-1", "doc-2", "doc-3"]);
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }
        assert!(backend.created().is_empty());
    }

    #[tokio::test]
    async fn create_rejection_is_create_failure() {
        let backend = InMemoryBackend::new().fail_create_with(RemoteError::Status {
            status: 403,
            message: "insufficient scope".into(),
        });
        let error = resolve(&backend, "Notes", 10).await.unwrap_err();
        assert!(matches!(error, PipelineError::CreateFailure(_)));
        assert!(error.to_string().contains("insufficient scope"));
    }

    #[tokio::test]
    async fn second_resolve_adopts_the_created_document() {
        let backend = InMemoryBackend::new();
        let first = resolve(&backend, "Notes", 10).await.unwrap();
        let second = resolve(&backend, "Notes", 10).await.unwrap();
        assert_eq!(second, Resolution::Adopted(first.into_handle()));
        assert_eq!(backend.created().len(), 1);
    }
}
