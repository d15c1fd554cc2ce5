// Consistent exit codes for the notemaker CLI.
//
//   0  = success
//   1  = general error
//   2  = usage/argument error (reported by clap)
//   11 = not signed in, or the token was rejected
//   12 = more than one notes document (conflict)
//   13 = network error or unreachable page

use notemaker_pipeline::error::{PipelineError, RemoteError};
use std::process;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    Error = 1,
    Auth = 11,
    Conflict = 12,
    Network = 13,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Map an anyhow error to an exit code by inspecting the error chain.
    pub fn from_error(err: &anyhow::Error) -> Self {
        for cause in err.chain() {
            if let Some(pipeline) = cause.downcast_ref::<PipelineError>() {
                return Self::from_pipeline(pipeline);
            }
        }
        Self::Error
    }

    pub fn from_pipeline(error: &PipelineError) -> Self {
        match error {
            PipelineError::AmbiguousDocument { .. } => Self::Conflict,
            PipelineError::NotSignedIn => Self::Auth,
            PipelineError::FetchFailure { .. } => Self::Network,
            other => match other.remote() {
                Some(RemoteError::Status { status: 401 | 403, .. }) => Self::Auth,
                Some(RemoteError::Transport(_)) => Self::Network,
                _ => Self::Error,
            },
        }
    }
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code.code() as u8)
    }
}
