// Batch Submitter: one atomic batch per append.

use tracing::{debug, info};

use notemaker_common::types::EditOperation;

use crate::error::PipelineError;
use crate::remote::DocumentEditor;

/// Send `operations` to `document_id` as a single batch.
///
/// The editor applies all or none of it. An empty batch is not sent. Failures
/// are not retried: a retry after an ambiguous failure could apply the batch
/// twice.
pub async fn submit(
    editor: &dyn DocumentEditor,
    document_id: &str,
    operations: &[EditOperation],
) -> Result<(), PipelineError> {
    if operations.is_empty() {
        debug!(document_id, "nothing to submit");
        return Ok(());
    }

    editor.batch_update(document_id, operations).await.map_err(|source| {
        PipelineError::BatchUpdateFailure { document_id: document_id.to_string(), source }
    })?;
    info!(document_id, operations = operations.len(), "batch applied");
    Ok(())
}
