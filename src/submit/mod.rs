//! Two-phase submission engine
//!
//! Handles the workflow of sending a draft proposal:
//! 1. Preparation - validate, check attachments, normalize into a payload
//! 2. Execution - send the payload and report the outcome

mod execute;
mod payload;
mod prepare;
mod progress;

pub use execute::{execute_submission, ProposalSubmitted, SubmissionOutcome};
pub use payload::{CanonicalTimeline, MilestonePayload, ProposalPayload};
pub use prepare::{check_attachments, prepare_submission, MAX_ATTACHMENTS, MAX_ATTACHMENT_BYTES};
pub use progress::{NoopProgress, Phase, ProgressCallback};
