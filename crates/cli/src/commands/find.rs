// `notemaker find`: list documents carrying the notes title.

use clap::Args;
use serde::Serialize;

use notemaker_common::types::DocumentHandle;
use notemaker_pipeline::session::Session;
use notemaker_pipeline::status::StderrLog;

use super::{block_on, load_config, GlobalArgs, Remotes};
use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct FindArgs {}

#[derive(Debug, Serialize)]
pub struct FindResult {
    pub title: String,
    pub documents: Vec<DocumentHandle>,
}

pub fn run(_args: FindArgs, global: &GlobalArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(global)?;
    let remotes = Remotes::connect(&config)?;
    let log = StderrLog;
    let session = Session::new(&remotes.api, &remotes.api, &remotes.fetcher, &log, &config);

    let documents = block_on(session.find_documents())??;
    let result = FindResult { title: config.doc_title.clone(), documents };
    output::print_output(format, &result, format_human)?;
    Ok(())
}

// One id per line so the output can be piped.
fn format_human(result: &FindResult) -> String {
    result.documents.iter().map(|doc| doc.id.as_str()).collect::<Vec<_>>().join("\n")
}
