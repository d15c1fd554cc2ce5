// `notemaker resolve`: find the notes document, creating it if absent.

use clap::Args;

use notemaker_pipeline::resolve::Resolution;
use notemaker_pipeline::session::Session;
use notemaker_pipeline::status::StderrLog;

use super::append::document_url;
use super::{block_on, load_config, GlobalArgs, Remotes};
use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct ResolveArgs {}

pub fn run(_args: ResolveArgs, global: &GlobalArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(global)?;
    let remotes = Remotes::connect(&config)?;
    let log = StderrLog;
    let mut session = Session::new(&remotes.api, &remotes.api, &remotes.fetcher, &log, &config);

    let resolution = block_on(session.resolve_document())??;
    output::print_output(format, &resolution, format_human)?;
    Ok(())
}

fn format_human(resolution: &Resolution) -> String {
    document_url(&resolution.handle().id)
}
