//! Client-side observation of the asynchronous document analysis job.
//!
//! The backend queues analysis and exposes no completion callback; the
//! client probes the document until the result is attached or the poll
//! budget runs out. Both outcomes are distinct values for the caller.

use crate::models::Analysis;
use crate::services::api_client::ApiClient;
use client_core::{poll_until, ApiError, PollConfig, PollOutcome};

/// Queue an analysis job, then wait for its result within the budget.
pub async fn analyze_and_wait(
    client: &ApiClient,
    document_id: &str,
    config: &PollConfig,
) -> Result<PollOutcome<Analysis>, ApiError> {
    let accepted = client.analyze_document(document_id).await?;
    tracing::info!(
        document_id = %accepted.document_id,
        task_id = %accepted.task_id,
        "analysis queued"
    );
    wait_for_analysis(client, document_id, config).await
}

/// Probe the document until its analysis is attached or the budget is
/// exhausted. Probe-level API errors abort the poll.
pub async fn wait_for_analysis(
    client: &ApiClient,
    document_id: &str,
    config: &PollConfig,
) -> Result<PollOutcome<Analysis>, ApiError> {
    poll_until(config, "document_analysis", || async {
        let document = client.get_document(document_id).await?;
        Ok(if document.analyzed {
            document.analysis
        } else {
            None
        })
    })
    .await
}
