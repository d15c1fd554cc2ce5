// `notemaker signin`: store an OAuth access token.

use clap::Args;
use serde_json::json;

use notemaker_pipeline::credentials;

use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct SigninArgs {
    /// OAuth access token with the Drive and Docs scopes.
    #[arg(long)]
    token: String,
}

pub fn run(args: SigninArgs, format: OutputFormat) -> anyhow::Result<()> {
    credentials::store_access_token(&args.token)?;
    output::print_output(format, &json!({ "signed_in": true }), |_| {
        "Signed in. The token is stored in the OS keychain.".to_string()
    })?;
    Ok(())
}
