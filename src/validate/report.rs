//! Typed validation results

use crate::draft::DraftProposal;
use crate::types::MilestoneId;
use serde::Serialize;
use std::collections::HashMap;

/// Outcome of one rule for one field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum FieldStatus {
    /// Field passed
    #[default]
    Ok,
    /// Field failed with a user-facing reason
    Error(String),
}

impl FieldStatus {
    pub(crate) fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    /// Whether the field passed
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// The failure reason, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Ok => None,
            Self::Error(message) => Some(message),
        }
    }
}

/// Errors for a single milestone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MilestoneErrors {
    /// Title check
    pub title: FieldStatus,
    /// Description check
    pub description: FieldStatus,
    /// Amount check
    pub amount: FieldStatus,
    /// Due date check
    pub due_date: FieldStatus,
}

impl MilestoneErrors {
    /// Whether every field passed
    pub const fn is_clean(&self) -> bool {
        self.title.is_ok() && self.description.is_ok() && self.amount.is_ok() && self.due_date.is_ok()
    }

    /// Failure reasons in field order
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        [&self.title, &self.description, &self.amount, &self.due_date]
            .into_iter()
            .filter_map(FieldStatus::message)
    }
}

/// Per-field results for a whole draft
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    /// Bid amount presence, sign and budget range
    pub bid_amount: FieldStatus,
    /// Timeline amount presence and sign
    pub timeline_amount: FieldStatus,
    /// Timeline unit presence
    pub timeline_unit: FieldStatus,
    /// Timeline against the client's ceiling
    pub timeline: FieldStatus,
    /// Cover letter length
    pub cover_letter: FieldStatus,
    /// At least one milestone
    pub milestones: FieldStatus,
    /// Milestone amounts add up to the bid
    pub milestone_total: FieldStatus,
    /// Milestones with at least one failing field, by identity
    pub milestone_items: HashMap<MilestoneId, MilestoneErrors>,
}

impl FieldErrors {
    /// Errors for the milestone with `id`
    pub fn milestone(&self, id: MilestoneId) -> Option<&MilestoneErrors> {
        self.milestone_items.get(&id)
    }

    /// Errors for whatever milestone currently sits at `index` in `draft`
    ///
    /// Resolves through the milestone's id, so a report computed before a
    /// reorder never points at the wrong row.
    pub fn milestone_at(&self, draft: &DraftProposal, index: usize) -> Option<&MilestoneErrors> {
        draft
            .milestones
            .get(index)
            .and_then(|m| self.milestone_items.get(&m.id))
    }
}

/// Full validation result: field markers plus a flat summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Field-level results
    pub fields: FieldErrors,
    /// Every failure message, in display order
    pub messages: Vec<String>,
}

impl ValidationReport {
    /// Whether the draft passed every rule
    pub fn is_clean(&self) -> bool {
        self.messages.is_empty()
    }

    /// Whether `message` is among the failures
    pub fn contains(&self, message: &str) -> bool {
        self.messages.iter().any(|m| m == message)
    }
}
