//! Proposal submission endpoint
//!
//! Provides the interface the submitter talks to, plus an HTTP
//! implementation for the marketplace API.

mod factory;
mod http;

pub use factory::create_proposal_service;
pub use http::HttpProposalService;

use crate::error::Result;
use crate::submit::ProposalPayload;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// What the endpoint said about a submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResponse {
    /// Whether the proposal was accepted
    #[serde(default)]
    pub success: bool,
    /// Human-readable detail, shown verbatim on failure
    #[serde(default)]
    pub message: Option<String>,
}

impl SubmissionResponse {
    /// Accepted, no message
    pub const fn accepted() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// Rejected with `message`
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Submission endpoint trait
///
/// Transport problems are errors; a rejection the endpoint reports is a
/// normal [`SubmissionResponse`] with `success == false`.
#[async_trait]
pub trait ProposalService: Send + Sync {
    /// Submit a prepared proposal
    async fn submit_proposal(&self, payload: &ProposalPayload) -> Result<SubmissionResponse>;
}
