// `notemaker signout`: forget the stored access token.

use clap::Args;
use serde_json::json;

use notemaker_pipeline::credentials;

use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct SignoutArgs {}

pub fn run(_args: SignoutArgs, format: OutputFormat) -> anyhow::Result<()> {
    credentials::clear_access_token()?;
    output::print_output(format, &json!({ "signed_in": false }), |_| {
        format!(
            "Signed out. {} still takes effect if set.",
            credentials::TOKEN_ENV_VAR
        )
    })?;
    Ok(())
}
