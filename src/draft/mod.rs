//! Draft proposal state
//!
//! A [`DraftProposal`] is the unsaved bid a provider is editing. Edits are
//! transitions: each takes the current draft by reference and returns the
//! next one, leaving the original untouched when an edit is rejected.

pub mod sequencer;

use crate::error::{Error, Result};
use crate::types::{Attachment, Milestone, TimelineUnit};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// In-progress proposal for one opportunity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftProposal {
    /// Total bid
    #[serde(default)]
    pub bid_amount: Option<Decimal>,
    /// Number of timeline units
    #[serde(default)]
    pub timeline_amount: Option<u32>,
    /// Unit for `timeline_amount`
    #[serde(default)]
    pub timeline_unit: Option<TimelineUnit>,
    /// Free-text pitch to the client
    #[serde(default)]
    pub cover_letter: String,
    /// Milestones in execution order
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    /// Files to upload with the proposal
    #[serde(skip)]
    pub attachments: Vec<Attachment>,
}

/// Field edits for one milestone
///
/// `None` leaves a field alone. For the optional fields, `Some(None)`
/// clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MilestonePatch {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New amount, or `Some(None)` to clear
    pub amount: Option<Option<Decimal>>,
    /// New due date, or `Some(None)` to clear
    pub due_date: Option<Option<NaiveDate>>,
}

impl MilestonePatch {
    /// Set the title
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set or clear the amount
    #[must_use]
    pub const fn amount(mut self, amount: Option<Decimal>) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set or clear the due date
    #[must_use]
    pub const fn due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Whether the patch changes nothing
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.amount.is_none()
            && self.due_date.is_none()
    }

    fn apply(self, milestone: &mut Milestone) {
        if let Some(title) = self.title {
            milestone.title = title;
        }
        if let Some(description) = self.description {
            milestone.description = description;
        }
        if let Some(amount) = self.amount {
            milestone.amount = amount;
        }
        if let Some(due_date) = self.due_date {
            milestone.due_date = due_date;
        }
    }
}

impl DraftProposal {
    /// Empty draft
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft with the bid amount replaced
    #[must_use]
    pub fn with_bid_amount(&self, bid_amount: Option<Decimal>) -> Self {
        Self {
            bid_amount,
            ..self.clone()
        }
    }

    /// Draft with the timeline replaced
    #[must_use]
    pub fn with_timeline(&self, amount: Option<u32>, unit: Option<TimelineUnit>) -> Self {
        Self {
            timeline_amount: amount,
            timeline_unit: unit,
            ..self.clone()
        }
    }

    /// Draft with the cover letter replaced
    #[must_use]
    pub fn with_cover_letter(&self, cover_letter: impl Into<String>) -> Self {
        Self {
            cover_letter: cover_letter.into(),
            ..self.clone()
        }
    }

    /// Draft with `milestone` appended
    #[must_use]
    pub fn add_milestone(&self, milestone: Milestone) -> Self {
        let mut next = self.clone();
        sequencer::add(&mut next.milestones, milestone);
        next
    }

    /// Draft with the milestone at `index` patched
    pub fn update_milestone(&self, index: usize, patch: MilestonePatch) -> Result<Self> {
        let mut next = self.clone();
        sequencer::update(&mut next.milestones, index, |m| patch.apply(m))?;
        Ok(next)
    }

    /// Draft without the milestone at `index`
    pub fn remove_milestone(&self, index: usize) -> Result<Self> {
        let mut next = self.clone();
        sequencer::remove(&mut next.milestones, index)?;
        Ok(next)
    }

    /// Draft with the milestone at `from` moved to `to`
    pub fn move_milestone(&self, from: usize, to: usize) -> Result<Self> {
        let mut next = self.clone();
        sequencer::reorder(&mut next.milestones, from, to)?;
        Ok(next)
    }

    /// Draft with `attachment` added
    #[must_use]
    pub fn add_attachment(&self, attachment: Attachment) -> Self {
        let mut next = self.clone();
        next.attachments.push(attachment);
        next
    }

    /// Draft without the attachment at `index`
    pub fn remove_attachment(&self, index: usize) -> Result<Self> {
        if index >= self.attachments.len() {
            return Err(Error::AttachmentNotFound(index));
        }
        let mut next = self.clone();
        next.attachments.remove(index);
        Ok(next)
    }

    /// Renumber milestones in place
    ///
    /// Needed after deserializing a draft whose sequence numbers were
    /// edited by hand.
    pub fn resequence(&mut self) {
        sequencer::resequence(&mut self.milestones);
    }

    /// Sum of milestone amounts; missing amounts count as zero
    ///
    /// `None` when the sum does not fit in a `Decimal`.
    pub fn milestone_total(&self) -> Option<Decimal> {
        self.milestones
            .iter()
            .filter_map(|m| m.amount)
            .try_fold(Decimal::ZERO, Decimal::checked_add)
    }

    /// Timeline as a day count, when both parts are set
    pub fn timeline_in_days(&self) -> Option<u32> {
        match (self.timeline_amount, self.timeline_unit) {
            (Some(amount), Some(unit)) => Some(unit.to_days(amount)),
            _ => None,
        }
    }

    /// Position of the milestone with `id`
    pub fn position_of(&self, id: crate::types::MilestoneId) -> Option<usize> {
        self.milestones.iter().position(|m| m.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn milestone(title: &str, amount: i64) -> Milestone {
        Milestone::new(title, "work", Some(Decimal::from(amount)), None)
    }

    #[test]
    fn test_transitions_leave_original_untouched() {
        let draft = DraftProposal::new().add_milestone(milestone("a", 100));
        let next = draft.add_milestone(milestone("b", 200));

        assert_eq!(draft.milestones.len(), 1);
        assert_eq!(next.milestones.len(), 2);
        assert_eq!(next.milestones[1].sequence, 2);
    }

    #[test]
    fn test_failed_transition_keeps_draft() {
        let draft = DraftProposal::new().add_milestone(milestone("a", 100));
        let err = draft.remove_milestone(3).unwrap_err();
        assert!(matches!(err, Error::MilestoneNotFound(3)));
        assert_eq!(draft.milestones.len(), 1);
    }

    #[test]
    fn test_update_milestone_patch() {
        let draft = DraftProposal::new().add_milestone(milestone("a", 100));
        let due = NaiveDate::from_ymd_opt(2030, 1, 15).unwrap();
        let next = draft
            .update_milestone(
                0,
                MilestonePatch::default()
                    .title("Design")
                    .amount(None)
                    .due_date(Some(due)),
            )
            .unwrap();

        let m = &next.milestones[0];
        assert_eq!(m.title, "Design");
        assert_eq!(m.description, "work");
        assert_eq!(m.amount, None);
        assert_eq!(m.due_date, Some(due));
        assert_eq!(m.id, draft.milestones[0].id);
    }

    #[test]
    fn test_empty_patch() {
        assert!(MilestonePatch::default().is_empty());
        assert!(!MilestonePatch::default().title("x").is_empty());
    }

    #[test]
    fn test_milestone_total_ignores_missing_amounts() {
        let draft = DraftProposal::new()
            .add_milestone(milestone("a", 400))
            .add_milestone(Milestone::new("b", "", None, None))
            .add_milestone(milestone("c", 500));
        assert_eq!(draft.milestone_total(), Some(Decimal::from(900)));
    }

    #[test]
    fn test_timeline_amount_is_whole_units() {
        assert!(serde_json::from_str::<DraftProposal>(r#"{"timeline_amount": 1.5}"#).is_err());
        assert!(serde_json::from_str::<DraftProposal>(r#"{"timeline_amount": -1}"#).is_err());
        let draft: DraftProposal = serde_json::from_str(r#"{"timeline_amount": 0}"#).unwrap();
        assert_eq!(draft.timeline_amount, Some(0));
    }

    #[test]
    fn test_milestone_total_overflow() {
        let huge = Milestone::new("a", "", Some(Decimal::MAX), None);
        let draft = DraftProposal::new()
            .add_milestone(huge.clone())
            .add_milestone(huge);
        assert_eq!(draft.milestone_total(), None);
    }

    #[test]
    fn test_timeline_in_days() {
        let draft = DraftProposal::new().with_timeline(Some(2), Some(TimelineUnit::Week));
        assert_eq!(draft.timeline_in_days(), Some(14));
        assert_eq!(
            draft.with_timeline(Some(2), None).timeline_in_days(),
            None
        );
    }

    #[test]
    fn test_attachments_add_remove() {
        let draft = DraftProposal::new()
            .add_attachment(Attachment::new("a.pdf", vec![1, 2, 3]))
            .add_attachment(Attachment::new("a.pdf", vec![1, 2, 3]));
        // Same file twice is allowed; membership is per list entry
        assert_eq!(draft.attachments.len(), 2);

        let next = draft.remove_attachment(0).unwrap();
        assert_eq!(next.attachments.len(), 1);
        assert!(matches!(
            next.remove_attachment(1),
            Err(Error::AttachmentNotFound(1))
        ));
    }

    #[test]
    fn test_move_milestone_keeps_ids() {
        let draft = DraftProposal::new()
            .add_milestone(milestone("a", 1))
            .add_milestone(milestone("b", 2));
        let first_id = draft.milestones[0].id;
        let moved = draft.move_milestone(0, 1).unwrap();
        assert_eq!(moved.position_of(first_id), Some(1));
        assert_eq!(moved.milestones[1].sequence, 2);
    }

    #[test]
    fn test_deserialized_draft_can_be_resequenced() {
        let json = r#"{
            "bid_amount": "1000",
            "timeline_amount": 2,
            "timeline_unit": "week",
            "cover_letter": "hello",
            "milestones": [
                {"sequence": 7, "title": "a", "amount": "500"},
                {"sequence": 3, "title": "b", "amount": 500}
            ]
        }"#;
        let mut draft: DraftProposal = serde_json::from_str(json).unwrap();
        assert!(!sequencer::is_dense(&draft.milestones));
        draft.resequence();
        assert!(sequencer::is_dense(&draft.milestones));
        assert_eq!(draft.milestone_total(), Some(Decimal::from(1000)));
        assert_ne!(draft.milestones[0].id, draft.milestones[1].id);
    }
}
