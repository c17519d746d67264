//! Progress callback trait for interface-agnostic updates
//!
//! This trait allows different front ends (CLI, a desktop shell, a web
//! view) to follow a submission and react to its outcome.

use crate::error::Error;
use crate::submit::{ProposalPayload, ProposalSubmitted};
use async_trait::async_trait;
use std::fmt;

/// Submission phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Validating the draft and checking attachments
    Validating,
    /// Waiting on the submission endpoint
    Submitting,
    /// Submission complete
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validating => write!(f, "Validating"),
            Self::Submitting => write!(f, "Submitting"),
            Self::Complete => write!(f, "Complete"),
        }
    }
}

/// Progress callback trait
///
/// Implement this trait to receive progress updates during submission.
/// A listing that caches opportunities subscribes through
/// [`ProgressCallback::on_submitted`].
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called when entering a new phase
    async fn on_phase(&self, phase: Phase);

    /// Called with the payload a dry run would have sent
    async fn on_payload(&self, payload: &ProposalPayload);

    /// Called once the endpoint accepted the proposal
    async fn on_submitted(&self, event: &ProposalSubmitted);

    /// Called when the submission fails
    async fn on_error(&self, error: &Error);

    /// Called with a general status message
    async fn on_message(&self, message: &str);
}

/// No-op progress callback for testing or when progress isn't needed
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_phase(&self, _phase: Phase) {}
    async fn on_payload(&self, _payload: &ProposalPayload) {}
    async fn on_submitted(&self, _event: &ProposalSubmitted) {}
    async fn on_error(&self, _error: &Error) {}
    async fn on_message(&self, _message: &str) {}
}
