//! Proposal session
//!
//! One open proposal dialog: it owns the draft for a single opportunity,
//! exposes a busy flag for the front end, and closes itself once the
//! proposal is accepted.

use crate::draft::DraftProposal;
use crate::error::{Error, Result};
use crate::service::ProposalService;
use crate::submit::{
    execute_submission, prepare_submission, Phase, ProgressCallback, SubmissionOutcome,
};
use crate::types::Opportunity;
use crate::validate::{validate_as_of, ValidationReport};
use chrono::{Local, NaiveDate};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Shared "submission in flight" flag
///
/// Clones observe the same flag, so a front end can keep one to grey out
/// its submit control.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    /// Whether a submission is running
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Mark busy until the returned guard drops
    pub fn try_acquire(&self) -> Result<BusyGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::SubmissionInProgress)?;
        Ok(BusyGuard(Arc::clone(&self.0)))
    }
}

/// Clears its [`BusyFlag`] on drop
#[derive(Debug)]
pub struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One provider bidding on one opportunity
#[derive(Debug)]
pub struct ProposalSession {
    opportunity: Option<Opportunity>,
    draft: DraftProposal,
    busy: BusyFlag,
    open: bool,
}

impl ProposalSession {
    /// Open a session with an empty draft
    pub fn open(opportunity: Opportunity) -> Self {
        Self::with_draft(Some(opportunity), DraftProposal::new())
    }

    /// Session around an existing draft
    ///
    /// `opportunity` may be absent; submitting then fails with
    /// [`Error::MissingOpportunity`] once the draft itself is valid.
    pub fn with_draft(opportunity: Option<Opportunity>, draft: DraftProposal) -> Self {
        Self {
            opportunity,
            draft,
            busy: BusyFlag::default(),
            open: true,
        }
    }

    /// The opportunity being bid on
    pub const fn opportunity(&self) -> Option<&Opportunity> {
        self.opportunity.as_ref()
    }

    /// Current draft
    pub const fn draft(&self) -> &DraftProposal {
        &self.draft
    }

    /// Handle on the busy flag
    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    /// Whether a submission is running
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Whether the dialog is still open
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Apply a draft transition
    ///
    /// The draft is replaced only if `transition` succeeds.
    pub fn edit<F>(&mut self, transition: F) -> Result<()>
    where
        F: FnOnce(&DraftProposal) -> Result<DraftProposal>,
    {
        if !self.open {
            return Err(Error::Internal("session is closed".to_string()));
        }
        self.draft = transition(&self.draft)?;
        Ok(())
    }

    /// Validate the draft as of today
    pub fn validate(&self) -> ValidationReport {
        self.validate_as_of(Local::now().date_naive())
    }

    /// Validate the draft as of `today`
    pub fn validate_as_of(&self, today: NaiveDate) -> ValidationReport {
        let constraints = self
            .opportunity
            .as_ref()
            .map(|o| o.constraints.clone())
            .unwrap_or_default();
        validate_as_of(&self.draft, &constraints, today)
    }

    /// Discard the draft and close
    pub fn cancel(&mut self) {
        debug!("Proposal session cancelled");
        self.draft = DraftProposal::new();
        self.open = false;
    }

    /// Submit the draft
    pub async fn submit(
        &mut self,
        service: &dyn ProposalService,
        progress: &dyn ProgressCallback,
        dry_run: bool,
    ) -> Result<SubmissionOutcome> {
        self.submit_as_of(service, progress, dry_run, Local::now().date_naive())
            .await
    }

    /// Submit the draft, judging due dates against `today`
    ///
    /// The draft survives every failure. On acceptance it is cleared and
    /// the session closes.
    pub async fn submit_as_of(
        &mut self,
        service: &dyn ProposalService,
        progress: &dyn ProgressCallback,
        dry_run: bool,
        today: NaiveDate,
    ) -> Result<SubmissionOutcome> {
        if !self.open {
            return Err(Error::Internal("session is closed".to_string()));
        }
        let _guard = self.busy.try_acquire()?;

        progress.on_phase(Phase::Validating).await;
        let payload = match prepare_submission(&self.draft, self.opportunity.as_ref(), today) {
            Ok(payload) => payload,
            Err(e) => {
                progress.on_error(&e).await;
                return Err(e);
            }
        };

        let outcome = execute_submission(&payload, service, progress, dry_run).await?;

        if let SubmissionOutcome::Submitted(event) = &outcome {
            if let Some(opportunity) = self.opportunity.as_mut() {
                opportunity.record_submission();
            }
            debug!("Closing session for {}", event.opportunity_id);
            self.draft = DraftProposal::new();
            self.open = false;
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_flag_guard_releases() {
        let flag = BusyFlag::default();
        let observer = flag.clone();

        let guard = flag.try_acquire().unwrap();
        assert!(observer.is_busy());
        assert!(matches!(flag.try_acquire(), Err(Error::SubmissionInProgress)));

        drop(guard);
        assert!(!observer.is_busy());
        assert!(flag.try_acquire().is_ok());
    }

    #[test]
    fn test_edit_keeps_draft_on_error() {
        let mut session = ProposalSession::with_draft(None, DraftProposal::new());
        session
            .edit(|d| Ok(d.with_cover_letter("A cover letter long enough")))
            .unwrap();

        let err = session.edit(|d| d.remove_milestone(0)).unwrap_err();
        assert!(matches!(err, Error::MilestoneNotFound(0)));
        assert_eq!(session.draft().cover_letter, "A cover letter long enough");
    }

    #[test]
    fn test_cancel_clears_and_closes() {
        let mut session =
            ProposalSession::with_draft(None, DraftProposal::new().with_cover_letter("hello"));
        session.cancel();

        assert!(!session.is_open());
        assert_eq!(session.draft(), &DraftProposal::new());
        assert!(session.edit(|d| Ok(d.clone())).is_err());
    }
}
