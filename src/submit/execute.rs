//! Phase 2: Submission execution
//!
//! Sends a prepared payload to the submission endpoint and reports the
//! outcome. Failures are not retried.

use crate::error::{Error, Result};
use crate::service::ProposalService;
use crate::submit::{Phase, ProgressCallback, ProposalPayload};
use serde::Serialize;
use tracing::{info, warn};

/// Domain event: the endpoint accepted a proposal
///
/// Listings that cache opportunities apply this to mark the opportunity
/// as already proposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProposalSubmitted {
    /// Opportunity the proposal was for
    pub opportunity_id: String,
    /// Confirmation text from the endpoint, if any
    pub message: Option<String>,
}

/// Result of submission execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The endpoint accepted the proposal
    Submitted(ProposalSubmitted),
    /// Dry run; nothing was sent
    DryRun,
}

/// Fallback when the endpoint rejects without saying why
const GENERIC_FAILURE: &str = "Failed to submit proposal. Please try again.";

/// Execute a prepared submission
///
/// On rejection the endpoint's message is returned verbatim as
/// [`Error::Submission`].
pub async fn execute_submission(
    payload: &ProposalPayload,
    service: &dyn ProposalService,
    progress: &dyn ProgressCallback,
    dry_run: bool,
) -> Result<SubmissionOutcome> {
    if dry_run {
        progress
            .on_message("Dry run - the proposal will not be sent")
            .await;
        progress.on_payload(payload).await;
        return Ok(SubmissionOutcome::DryRun);
    }

    progress.on_phase(Phase::Submitting).await;

    let response = match service.submit_proposal(payload).await {
        Ok(response) => response,
        Err(e) => {
            warn!("Submission for {} failed: {e}", payload.opportunity_id);
            progress.on_error(&e).await;
            return Err(e);
        }
    };

    if !response.success {
        let message = response
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());
        warn!("Submission for {} rejected: {message}", payload.opportunity_id);
        let err = Error::Submission(message);
        progress.on_error(&err).await;
        return Err(err);
    }

    info!("Proposal submitted for {}", payload.opportunity_id);

    let event = ProposalSubmitted {
        opportunity_id: payload.opportunity_id.clone(),
        message: response.message,
    };
    progress.on_submitted(&event).await;
    progress.on_phase(Phase::Complete).await;

    Ok(SubmissionOutcome::Submitted(event))
}
