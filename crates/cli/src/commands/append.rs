// `notemaker append`: fetch a page and append its headings and emphasis.

use clap::Args;

use notemaker_pipeline::session::{AppendReport, Session};
use notemaker_pipeline::status::StderrLog;

use super::{block_on, load_config, GlobalArgs, Remotes};
use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct AppendArgs {
    /// Page to take notes from (http or https).
    url: String,
}

pub fn run(args: AppendArgs, global: &GlobalArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(global)?;
    let remotes = Remotes::connect(&config)?;
    let log = StderrLog;
    let mut session = Session::new(&remotes.api, &remotes.api, &remotes.fetcher, &log, &config);

    let report = block_on(session.append_from_url(&args.url))??;
    output::print_output(format, &report, format_human)?;
    Ok(())
}

pub(crate) fn document_url(document_id: &str) -> String {
    format!("https://docs.google.com/document/d/{document_id}/edit")
}

fn format_human(report: &AppendReport) -> String {
    let verb = if report.created { "Created" } else { "Updated" };
    if report.operations == 0 {
        return format!("Nothing appended. Notes: {}", document_url(&report.document.id));
    }
    format!(
        "{verb} \"{}\" with {} element(s): {}",
        report.document.title,
        report.elements,
        document_url(&report.document.id)
    )
}
