// Output format auto-detection for the CLI.
//
// TTY → human-readable text. Piped/redirected → structured JSON.
// `--json` flag forces JSON output regardless of terminal.

use notemaker_pipeline::error::{PipelineError, RemoteError};
use serde::Serialize;
use std::io::{self, IsTerminal, Write};

const ANSI_RED: &str = "\x1b[31m";
const ANSI_RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text.
    Human,
    /// Machine-readable JSON (one object per response).
    Json,
}

impl OutputFormat {
    /// Auto-detect format: JSON if `--json` was passed or stdout is not a TTY.
    pub fn detect(json_flag: bool) -> Self {
        if json_flag {
            return Self::Json;
        }
        Self::detect_from_terminal(io::stdout().is_terminal())
    }

    pub fn detect_from_terminal(is_tty: bool) -> Self {
        if is_tty {
            Self::Human
        } else {
            Self::Json
        }
    }
}

/// Write a value to stdout in the selected format.
pub fn print_output<T, F>(format: OutputFormat, value: &T, human_fn: F) -> io::Result<()>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    write_output(&mut io::stdout().lock(), format, value, human_fn)
}

/// Write a value to a provided writer.
pub fn write_output<W, T, F>(
    writer: &mut W,
    format: OutputFormat,
    value: &T,
    human_fn: F,
) -> io::Result<()>
where
    W: Write,
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Human => {
            writeln!(writer, "{}", human_fn(value))
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *writer, value).map_err(io::Error::other)?;
            writeln!(writer)
        }
    }
}

/// Write an error to stderr in the selected format.
pub fn print_error(format: OutputFormat, code: &str, message: &str) {
    let mut err = io::stderr().lock();
    match format {
        OutputFormat::Human => {
            let line = render_human_stderr_line("error", message, io::stderr().is_terminal());
            let _ = writeln!(err, "{line}");
        }
        OutputFormat::Json => {
            let obj = serde_json::json!({
                "error": {
                    "code": code,
                    "message": message,
                }
            });
            let _ = serde_json::to_writer(&mut err, &obj);
            let _ = writeln!(err);
        }
    }
}

/// Print a mapped, actionable error for a command failure.
pub fn print_anyhow_error(format: OutputFormat, error: &anyhow::Error) {
    let (code, message) = actionable_error(error);
    print_error(format, code, &message);
}

fn actionable_error(error: &anyhow::Error) -> (&'static str, String) {
    let Some(pipeline) = error.chain().find_map(|cause| cause.downcast_ref::<PipelineError>())
    else {
        return ("ERROR", format!("{error:#}"));
    };

    match pipeline {
        PipelineError::AmbiguousDocument { title, candidates } => (
            pipeline.code(),
            format!(
                "{} documents are titled \"{title}\". Run: notemaker find, then rename or trash all but one.",
                candidates.len()
            ),
        ),
        PipelineError::NotSignedIn => (
            pipeline.code(),
            "Not signed in. Run: notemaker signin --token <TOKEN>".to_string(),
        ),
        other if matches!(other.remote(), Some(RemoteError::Status { status: 401, .. })) => (
            "AUTH_FAILURE",
            "The access token was rejected or has expired. Run: notemaker signin --token <TOKEN>"
                .to_string(),
        ),
        other => (other.code(), other.to_string()),
    }
}

fn render_human_stderr_line(label: &str, message: &str, is_tty: bool) -> String {
    if is_tty {
        format!("{ANSI_RED}{label}:{ANSI_RESET} {message}")
    } else {
        format!("{label}: {message}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notemaker_common::types::DocumentHandle;

    #[test]
    fn detect_tty_returns_human() {
        assert_eq!(OutputFormat::detect_from_terminal(true), OutputFormat::Human);
    }

    #[test]
    fn detect_pipe_returns_json() {
        assert_eq!(OutputFormat::detect_from_terminal(false), OutputFormat::Json);
    }

    #[test]
    fn detect_json_flag_overrides_tty() {
        assert_eq!(OutputFormat::detect(true), OutputFormat::Json);
    }

    #[test]
    fn write_output_human_format() {
        #[derive(Serialize)]
        struct Info {
            id: String,
        }
        let info = Info { id: "doc-1".into() };
        let mut buf = Vec::new();
        write_output(&mut buf, OutputFormat::Human, &info, |i| format!("Document: {}", i.id))
            .unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Document: doc-1\n");
    }

    #[test]
    fn write_output_json_does_not_call_human_fn() {
        #[derive(Serialize)]
        struct Info {
            elements: u32,
        }
        let mut buf = Vec::new();
        write_output(&mut buf, OutputFormat::Json, &Info { elements: 3 }, |_| {
            unreachable!("human_fn should not be called in JSON mode")
        })
        .unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert!(output.ends_with('\n'));
        let parsed: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        assert_eq!(parsed["elements"], 3);
    }

    #[test]
    fn render_human_error_uses_color_for_tty() {
        let line = render_human_stderr_line("error", "boom", true);
        assert!(line.contains(ANSI_RED));
        assert!(line.contains(ANSI_RESET));
        assert!(line.contains("boom"));
        assert_eq!(render_human_stderr_line("error", "boom", false), "error: boom");
    }

    #[test]
    fn ambiguous_document_suggests_find() {
        let err = anyhow::Error::new(PipelineError::AmbiguousDocument {
            title: "Notes".into(),
            candidates: vec![DocumentHandle::new("a", "Notes"), DocumentHandle::new("b", "Notes")],
        });
        let (code, message) = actionable_error(&err);
        assert_eq!(code, "AMBIGUOUS_DOCUMENT");
        assert!(message.starts_with("2 documents are titled \"Notes\""));
        assert!(message.contains("notemaker find"));
    }

    #[test]
    fn rejected_token_suggests_signin() {
        let err = anyhow::Error::new(PipelineError::CreateFailure(RemoteError::Status {
            status: 401,
            message: "Request had invalid authentication credentials.".into(),
        }));
        let (code, message) = actionable_error(&err);
        assert_eq!(code, "AUTH_FAILURE");
        assert!(message.contains("notemaker signin"));
    }

    #[test]
    fn not_signed_in_suggests_signin() {
        let (code, message) = actionable_error(&anyhow::Error::new(PipelineError::NotSignedIn));
        assert_eq!(code, "NOT_SIGNED_IN");
        assert!(message.contains("signin --token"));
    }

    #[test]
    fn other_pipeline_errors_keep_their_message() {
        let err = anyhow::Error::new(PipelineError::FetchFailure {
            url: "https://example.com/a".into(),
            source: RemoteError::Transport("dns error".into()),
        });
        let (code, message) = actionable_error(&err);
        assert_eq!(code, "FETCH_FAILED");
        assert!(message.contains("https://example.com/a"));
        assert!(message.contains("dns error"));
    }

    #[test]
    fn unrelated_errors_are_generic() {
        let (code, message) = actionable_error(&anyhow::anyhow!("disk full"));
        assert_eq!(code, "ERROR");
        assert_eq!(message, "disk full");
    }
}
