// CLI subcommand dispatch and the wiring shared by the subcommands.

use std::future::Future;

use anyhow::Context;
use clap::{Args, Subcommand};
use tracing::debug;

use notemaker_pipeline::config::NotemakerConfig;
use notemaker_pipeline::credentials;
use notemaker_pipeline::error::PipelineError;
use notemaker_pipeline::remote::fetch::HttpPageFetcher;
use notemaker_pipeline::remote::google::GoogleApi;

use crate::output::OutputFormat;

pub mod append;
pub mod find;
pub mod preview;
pub mod resolve;
pub mod signin;
pub mod signout;

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Title of the notes document (overrides the config file).
    #[arg(long, global = true)]
    pub title: Option<String>,

    /// Force JSON output.
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Append a page's headings and emphasis to the notes document
    Append(append::AppendArgs),
    /// List documents carrying the notes title
    Find(find::FindArgs),
    /// Find the notes document, creating it if none exists
    Resolve(resolve::ResolveArgs),
    /// Show what would be appended from a page or local file, without signing in
    Preview(preview::PreviewArgs),
    /// Store a Google OAuth access token in the OS keychain
    Signin(signin::SigninArgs),
    /// Remove the stored access token
    Signout(signout::SignoutArgs),
}

pub fn run(cmd: Command, global: &GlobalArgs, format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        Command::Append(args) => append::run(args, global, format),
        Command::Find(args) => find::run(args, global, format),
        Command::Resolve(args) => resolve::run(args, global, format),
        Command::Preview(args) => preview::run(args, global, format),
        Command::Signin(args) => signin::run(args, format),
        Command::Signout(args) => signout::run(args, format),
    }
}

/// Config file, then environment, then `--title`.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<NotemakerConfig, PipelineError> {
    let mut config = NotemakerConfig::load()?.with_env_overrides();
    if let Some(title) = &global.title {
        config.doc_title = title.clone();
    }
    config.validate()?;
    debug!(title = %config.doc_title, page_size = config.page_size, proxy = ?config.proxy_url, "configuration loaded");
    Ok(config)
}

/// Authenticated remotes for commands that touch Drive or Docs.
pub(crate) struct Remotes {
    pub api: GoogleApi,
    pub fetcher: HttpPageFetcher,
}

impl Remotes {
    pub fn connect(config: &NotemakerConfig) -> anyhow::Result<Self> {
        let token = credentials::require_access_token()?;
        Ok(Self {
            api: GoogleApi::new(token, config).context("failed to set up Google API client")?,
            fetcher: HttpPageFetcher::new(config).context("failed to set up page fetcher")?,
        })
    }
}

pub(crate) fn block_on<F: Future>(future: F) -> anyhow::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    Ok(runtime.block_on(future))
}
