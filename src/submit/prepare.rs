//! Phase 1: Submission preparation
//!
//! Turns a draft into a payload, or explains why it can't be sent. Nothing
//! here touches the network.

use crate::draft::{sequencer, DraftProposal};
use crate::error::{Error, Result};
use crate::submit::{CanonicalTimeline, MilestonePayload, ProposalPayload};
use crate::types::{Attachment, Constraints, Milestone, Opportunity};
use crate::validate::validate_as_of;
use chrono::{NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Most files one proposal may carry
pub const MAX_ATTACHMENTS: usize = 3;

/// Largest accepted file, in bytes (10 MB)
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Build the payload for `draft`
///
/// Steps, in order, each aborting on failure:
/// 1. validate the draft (all messages collected)
/// 2. require an opportunity
/// 3. check attachment count and sizes
/// 4. normalize milestones and the timeline
pub fn prepare_submission(
    draft: &DraftProposal,
    opportunity: Option<&Opportunity>,
    today: NaiveDate,
) -> Result<ProposalPayload> {
    let unconstrained = Constraints::default();
    let constraints = opportunity.map_or(&unconstrained, |o| &o.constraints);

    let report = validate_as_of(draft, constraints, today);
    if !report.is_clean() {
        warn!("Draft rejected with {} validation error(s)", report.messages.len());
        return Err(Error::Validation(report.messages));
    }

    let opportunity = opportunity.ok_or(Error::MissingOpportunity)?;

    check_attachments(&draft.attachments)?;

    let bid_amount = draft
        .bid_amount
        .ok_or_else(|| Error::Internal("validated draft has no bid amount".to_string()))?;
    let (Some(amount), Some(unit)) = (draft.timeline_amount, draft.timeline_unit) else {
        return Err(Error::Internal("validated draft has no timeline".to_string()));
    };

    let mut milestones = draft.milestones.clone();
    sequencer::resequence(&mut milestones);

    debug!(
        "Prepared proposal for {} with {} milestone(s), {} attachment(s)",
        opportunity.id,
        milestones.len(),
        draft.attachments.len()
    );

    Ok(ProposalPayload {
        opportunity_id: opportunity.id.clone(),
        bid_amount,
        timeline: CanonicalTimeline::new(amount, unit),
        cover_letter: draft.cover_letter.clone(),
        milestones: milestones.into_iter().map(normalize_milestone).collect(),
        attachments: draft.attachments.clone(),
    })
}

/// Enforce the attachment count and per-file size limits
pub fn check_attachments(attachments: &[Attachment]) -> Result<()> {
    if attachments.len() > MAX_ATTACHMENTS {
        return Err(Error::TooManyAttachments {
            count: attachments.len(),
            max: MAX_ATTACHMENTS,
        });
    }
    if let Some(large) = attachments.iter().find(|a| a.size() > MAX_ATTACHMENT_BYTES) {
        return Err(Error::AttachmentTooLarge {
            file_name: large.file_name.clone(),
            size: large.size(),
        });
    }
    Ok(())
}

fn normalize_milestone(milestone: Milestone) -> MilestonePayload {
    MilestonePayload {
        sequence: milestone.sequence,
        title: milestone.title.trim().to_string(),
        description: milestone.description,
        amount: milestone.amount.unwrap_or(Decimal::ZERO),
        due_date: milestone
            .due_date
            .map_or_else(Utc::now, |d| d.and_time(NaiveTime::MIN).and_utc()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TimelineUnit;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn make_opportunity() -> Opportunity {
        Opportunity {
            id: "opp-7".to_string(),
            title: "Mobile app".to_string(),
            constraints: Constraints {
                budget_min: Some(Decimal::from(500)),
                budget_max: Some(Decimal::from(5000)),
                original_timeline: "1 month".to_string(),
                original_timeline_in_days: 30,
            },
            has_submitted: false,
            proposals: 4,
        }
    }

    fn make_draft() -> DraftProposal {
        DraftProposal::new()
            .with_bid_amount(Some(Decimal::from(1000)))
            .with_timeline(Some(3), Some(TimelineUnit::Week))
            .with_cover_letter("Happy to help with the app build.")
            .add_milestone(Milestone::new(
                "  Wireframes  ",
                "Low fidelity",
                Some(Decimal::from(400)),
                Some(today()),
            ))
            .add_milestone(Milestone::new(
                "Build",
                "Ship it",
                Some(Decimal::from(600)),
                NaiveDate::from_ymd_opt(2026, 11, 30),
            ))
    }

    #[test]
    fn test_prepare_builds_normalized_payload() {
        let opp = make_opportunity();
        let payload = prepare_submission(&make_draft(), Some(&opp), today()).unwrap();

        assert_eq!(payload.opportunity_id, "opp-7");
        assert_eq!(payload.bid_amount, Decimal::from(1000));
        assert_eq!(payload.timeline.days, 21);
        assert_eq!(payload.timeline.display, "3 weeks");
        assert_eq!(payload.milestones.len(), 2);
        assert_eq!(payload.milestones[0].title, "Wireframes");
        assert_eq!(payload.milestones[0].sequence, 1);
        assert_eq!(payload.milestones[1].sequence, 2);
        assert_eq!(
            payload.milestones[1].due_date.to_rfc3339(),
            "2026-11-30T00:00:00+00:00"
        );
    }

    #[test]
    fn test_validation_runs_before_opportunity_check() {
        let draft = make_draft().with_cover_letter("too short");
        let err = prepare_submission(&draft, None, today()).unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m.len() == 1));
    }

    #[test]
    fn test_missing_opportunity() {
        let err = prepare_submission(&make_draft(), None, today()).unwrap_err();
        assert!(matches!(err, Error::MissingOpportunity));
    }

    #[test]
    fn test_opportunity_constraints_apply() {
        let opp = make_opportunity();
        let draft = make_draft().with_timeline(Some(2), Some(TimelineUnit::Month));
        let err = prepare_submission(&draft, Some(&opp), today()).unwrap_err();
        assert_eq!(
            err.messages(),
            vec!["Your timeline must be equal to or less than the company's timeline (1 month)."]
        );
    }

    #[test]
    fn test_too_many_attachments() {
        let opp = make_opportunity();
        let mut draft = make_draft();
        for i in 0..4 {
            draft = draft.add_attachment(Attachment::new(format!("f{i}.pdf"), vec![0u8; 10]));
        }
        let err = prepare_submission(&draft, Some(&opp), today()).unwrap_err();
        assert!(matches!(err, Error::TooManyAttachments { count: 4, max: 3 }));
    }

    #[test]
    fn test_attachment_size_limit_is_inclusive() {
        let exact = Attachment::new("exact.bin", vec![0u8; 10 * 1024 * 1024]);
        assert!(check_attachments(std::slice::from_ref(&exact)).is_ok());

        let over = Attachment::new("over.bin", vec![0u8; 10 * 1024 * 1024 + 1]);
        let err = check_attachments(&[exact, over]).unwrap_err();
        match err {
            Error::AttachmentTooLarge { file_name, size } => {
                assert_eq!(file_name, "over.bin");
                assert_eq!(size, 10 * 1024 * 1024 + 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_prepare_does_not_touch_draft() {
        let opp = make_opportunity();
        let draft = make_draft();
        let before = draft.clone();
        prepare_submission(&draft, Some(&opp), today()).unwrap();
        assert_eq!(draft, before);
    }
}
