// Error types for the append pipeline.
//
// `RemoteError` is what a backend (HTTP or in-memory) reports. `PipelineError`
// tags it with the pipeline stage that failed; the CLI maps those onto
// stable codes and exit codes.

use thiserror::Error;

use notemaker_common::types::DocumentHandle;

use crate::config::ConfigError;

/// Failure reported by a remote collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("{message} (status {status})")]
    Status { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("invalid url `{0}`")]
    InvalidUrl(String),
}

impl RemoteError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("listing documents failed: {0}")]
    ListFailure(#[source] RemoteError),

    #[error("creating document failed: {0}")]
    CreateFailure(#[source] RemoteError),

    #[error(
        "found {count} documents titled \"{title}\"; remove or rename all but one and retry",
        count = .candidates.len()
    )]
    AmbiguousDocument { title: String, candidates: Vec<DocumentHandle> },

    #[error("fetching {url} failed: {source}")]
    FetchFailure {
        url: String,
        #[source]
        source: RemoteError,
    },

    #[error("batch update of document {document_id} failed: {source}")]
    BatchUpdateFailure {
        document_id: String,
        #[source]
        source: RemoteError,
    },

    #[error("not signed in: run `notemaker signin --token <TOKEN>` or set NOTEMAKER_ACCESS_TOKEN")]
    NotSignedIn,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PipelineError {
    /// Short stage label used in status lines, e.g. `Error (list): ...`.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::ListFailure(_) => "list",
            Self::CreateFailure(_) => "create",
            Self::AmbiguousDocument { .. } => "resolve",
            Self::FetchFailure { .. } => "fetch",
            Self::BatchUpdateFailure { .. } => "batch update",
            Self::NotSignedIn => "auth",
            Self::Config(_) => "config",
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ListFailure(_) => "LIST_FAILED",
            Self::CreateFailure(_) => "CREATE_FAILED",
            Self::AmbiguousDocument { .. } => "AMBIGUOUS_DOCUMENT",
            Self::FetchFailure { .. } => "FETCH_FAILED",
            Self::BatchUpdateFailure { .. } => "BATCH_UPDATE_FAILED",
            Self::NotSignedIn => "NOT_SIGNED_IN",
            Self::Config(_) => "CONFIG_INVALID",
        }
    }

    /// The remote failure underneath, if any.
    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            Self::ListFailure(source) | Self::CreateFailure(source) => Some(source),
            Self::FetchFailure { source, .. } | Self::BatchUpdateFailure { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }

    /// Human-readable status line for the log area.
    pub fn status_line(&self) -> String {
        format!("Error ({}): {self}", self.stage())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambiguous_message_counts_candidates() {
        let error = PipelineError::AmbiguousDocument {
            title: "Note Maker Notes".into(),
            candidates: vec![DocumentHandle::new("a", "Note Maker Notes"), DocumentHandle::new("b", "Note Maker Notes")],
        };
        let message = error.to_string();
        assert!(message.contains("found 2 documents"));
        assert!(message.contains("Note Maker Notes"));
        assert_eq!(error.code(), "AMBIGUOUS_DOCUMENT");
    }

    #[test]
    fn status_line_names_stage_and_server_message() {
        let error = PipelineError::BatchUpdateFailure {
            document_id: "doc-1".into(),
            source: RemoteError::Status { status: 400, message: "Invalid requests[0]".into() },
        };
        let line = error.status_line();
        assert!(line.starts_with("Error (batch update): "));
        assert!(line.contains("Invalid requests[0]"));
        assert_eq!(error.remote().and_then(RemoteError::status), Some(400));
    }

    #[test]
    fn list_failure_uses_list_stage() {
        let error = PipelineError::ListFailure(RemoteError::Transport("connection reset".into()));
        assert_eq!(error.status_line(), "Error (list): listing documents failed: transport error: connection reset");
    }
}
