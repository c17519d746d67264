//! Mock proposal service and progress recorder for testing
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use bidline::error::{Error, Result};
use bidline::service::{ProposalService, SubmissionResponse};
use bidline::submit::{Phase, ProgressCallback, ProposalPayload, ProposalSubmitted};
use std::sync::Mutex;

/// Simple mock proposal service for testing
///
/// Features:
/// - Call tracking for verification
/// - Configurable response
/// - Error injection for transport failures
pub struct MockProposalService {
    response: Mutex<SubmissionResponse>,
    calls: Mutex<Vec<ProposalPayload>>,
    error: Mutex<Option<String>>,
}

impl Default for MockProposalService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProposalService {
    /// Mock that accepts every proposal
    pub fn new() -> Self {
        Self {
            response: Mutex::new(SubmissionResponse::accepted()),
            calls: Mutex::new(Vec::new()),
            error: Mutex::new(None),
        }
    }

    // === Response configuration ===

    /// Answer with `success: false` and `message`
    pub fn reject_with(&self, message: &str) {
        *self.response.lock().unwrap() = SubmissionResponse::rejected(message);
    }

    /// Answer with an arbitrary response
    pub fn respond_with(&self, response: SubmissionResponse) {
        *self.response.lock().unwrap() = response;
    }

    /// Fail every call as if the transport broke
    pub fn fail_with(&self, message: &str) {
        *self.error.lock().unwrap() = Some(message.to_string());
    }

    // === Call verification methods ===

    /// Every payload received
    pub fn calls(&self) -> Vec<ProposalPayload> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of submissions received
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Assert the endpoint was never reached
    pub fn assert_not_called(&self) {
        let calls = self.calls();
        assert!(
            calls.is_empty(),
            "Expected no submission but got {} call(s) for {:?}",
            calls.len(),
            calls.iter().map(|c| &c.opportunity_id).collect::<Vec<_>>()
        );
    }
}

#[async_trait]
impl ProposalService for MockProposalService {
    async fn submit_proposal(&self, payload: &ProposalPayload) -> Result<SubmissionResponse> {
        self.calls.lock().unwrap().push(payload.clone());

        // Check for injected error
        if let Some(msg) = self.error.lock().unwrap().as_ref() {
            return Err(Error::Internal(msg.clone()));
        }

        Ok(self.response.lock().unwrap().clone())
    }
}

/// Progress callback that records what it was told
#[derive(Default)]
pub struct RecordingProgress {
    phases: Mutex<Vec<Phase>>,
    payloads: Mutex<Vec<ProposalPayload>>,
    submitted: Mutex<Vec<ProposalSubmitted>>,
    errors: Mutex<Vec<String>>,
    messages: Mutex<Vec<String>>,
}

impl RecordingProgress {
    /// Phases entered, in order
    pub fn phases(&self) -> Vec<Phase> {
        self.phases.lock().unwrap().clone()
    }

    /// Dry-run payloads
    pub fn payloads(&self) -> Vec<ProposalPayload> {
        self.payloads.lock().unwrap().clone()
    }

    /// Submission events
    pub fn submitted(&self) -> Vec<ProposalSubmitted> {
        self.submitted.lock().unwrap().clone()
    }

    /// Rendered errors
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    /// Status messages
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProgressCallback for RecordingProgress {
    async fn on_phase(&self, phase: Phase) {
        self.phases.lock().unwrap().push(phase);
    }

    async fn on_payload(&self, payload: &ProposalPayload) {
        self.payloads.lock().unwrap().push(payload.clone());
    }

    async fn on_submitted(&self, event: &ProposalSubmitted) {
        self.submitted.lock().unwrap().push(event.clone());
    }

    async fn on_error(&self, error: &Error) {
        self.errors.lock().unwrap().push(error.to_string());
    }

    async fn on_message(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
