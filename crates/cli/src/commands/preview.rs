// `notemaker preview`: dry run of an append.
//
// Extracts and compiles a page (fetched, or read from disk), then applies the
// batch to an empty local body to show what the notes would look like. No
// sign-in is needed and nothing is sent to Google.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use url::Url;

use notemaker_common::batch::simulate::{RenderedParagraph, StyledRun};
use notemaker_common::batch::{compile, BodyModel};
use notemaker_common::extract::extract;
use notemaker_common::types::{EditOperation, ExtractedElement, ParagraphStyle};
use notemaker_pipeline::error::PipelineError;
use notemaker_pipeline::remote::fetch::HttpPageFetcher;
use notemaker_pipeline::remote::PageFetcher;

use super::{block_on, load_config, GlobalArgs};
use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Page URL, `file://` URL, or path to a local HTML file.
    source: String,

    /// Also list the compiled edit operations.
    #[arg(long)]
    ops: bool,
}

#[derive(Debug, Serialize)]
pub struct PreviewResult {
    pub source: String,
    pub elements: Vec<ExtractedElement>,
    pub operations: Vec<EditOperation>,
    pub paragraphs: Vec<RenderedParagraph>,
    #[serde(skip)]
    show_ops: bool,
}

enum Source {
    Web(String),
    File(PathBuf),
}

fn classify_source(raw: &str) -> Source {
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Source::Web(raw.to_string()),
        Ok(url) if url.scheme() == "file" => match url.to_file_path() {
            Ok(path) => Source::File(path),
            Err(()) => Source::File(PathBuf::from(raw)),
        },
        _ => Source::File(PathBuf::from(raw)),
    }
}

pub fn run(args: PreviewArgs, global: &GlobalArgs, format: OutputFormat) -> anyhow::Result<()> {
    let html = match classify_source(&args.source) {
        Source::Web(url) => {
            let config = load_config(global)?;
            let fetcher = HttpPageFetcher::new(&config).context("failed to set up page fetcher")?;
            block_on(fetcher.fetch(&url))?
                .map_err(|source| PipelineError::FetchFailure { url: url.clone(), source })?
        }
        Source::File(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
    };

    let mut result = build_preview(&args.source, &html)?;
    result.show_ops = args.ops;
    output::print_output(format, &result, format_human)?;
    Ok(())
}

fn build_preview(source: &str, html: &str) -> anyhow::Result<PreviewResult> {
    let elements = extract(html);
    let operations = compile(&elements);
    let mut body = BodyModel::new();
    body.apply_batch(&operations).context("compiled batch does not apply to an empty document")?;

    Ok(PreviewResult {
        source: source.to_string(),
        elements,
        operations,
        paragraphs: body.paragraphs(),
        show_ops: false,
    })
}

fn format_human(result: &PreviewResult) -> String {
    if result.paragraphs.is_empty() {
        return format!("Nothing would be appended from {}.", result.source);
    }

    let mut lines: Vec<String> = result.paragraphs.iter().map(render_paragraph).collect();
    if result.show_ops {
        lines.push(String::new());
        lines.push(format!("{} operation(s):", result.operations.len()));
        lines.extend(result.operations.iter().map(|op| format!("  {}", describe_operation(op))));
    }
    lines.join("\n")
}

fn render_paragraph(paragraph: &RenderedParagraph) -> String {
    match paragraph.style {
        ParagraphStyle::Heading(level) => {
            format!("{} {}", "#".repeat(usize::from(level.get())), paragraph.text)
        }
        ParagraphStyle::Normal => paragraph.runs.iter().map(render_run).collect(),
    }
}

// Markdown-ish markers; underline has no markdown form.
fn render_run(run: &StyledRun) -> String {
    let mut text = run.text.clone();
    if run.style.underline {
        text = format!("__{text}__");
    }
    if run.style.italic {
        text = format!("*{text}*");
    }
    if run.style.bold {
        text = format!("**{text}**");
    }
    text
}

fn describe_operation(operation: &EditOperation) -> String {
    match operation {
        EditOperation::InsertText { text, index } => format!("insert {text:?} at {index}"),
        EditOperation::SetParagraphStyle { style, start, end } => {
            format!("paragraph style {style} on [{start}, {end})")
        }
        EditOperation::SetCharacterStyle { style, start, end } => {
            format!("{} on [{start}, {end})", style.style_field())
        }
    }
}
