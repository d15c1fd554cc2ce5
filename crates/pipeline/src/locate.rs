// Document Locator: exhaustive, sequential paginated title search.

use std::collections::HashSet;

use tracing::debug;

use notemaker_common::types::{DocumentHandle, DocumentQuery};

use crate::error::{PipelineError, RemoteError};
use crate::remote::DocumentDirectory;

/// Every non-trashed document titled exactly `title`, in server order.
///
/// Pages are requested one after another, each only once the previous
/// response has arrived. Any failing page aborts the whole search; partial
/// results are never returned.
pub async fn locate(
    directory: &dyn DocumentDirectory,
    title: &str,
    page_size: u32,
) -> Result<Vec<DocumentHandle>, PipelineError> {
    let mut query = DocumentQuery::for_title(title, page_size);
    let mut found = Vec::new();
    let mut seen_tokens = HashSet::new();

    for page_number in 1usize.. {
        let page = directory.list(&query).await.map_err(PipelineError::ListFailure)?;
        debug!(page_number, files = page.files.len(), more = page.next_page_token.is_some(), "directory page");
        found.extend(page.files);

        let token = match page.next_page_token {
            Some(token) if !token.is_empty() => token,
            _ => break,
        };
        if !seen_tokens.insert(token.clone()) {
            return Err(PipelineError::ListFailure(RemoteError::Malformed(format!(
                "page token `{token}` was returned twice"
            ))));
        }
        query = query.next_page(token);
    }

    Ok(found)
}
