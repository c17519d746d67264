//! Draft validation
//!
//! [`validate`] checks a draft against an opportunity's constraints and
//! collects every failure; nothing short-circuits, so a form can mark all
//! problems at once. Validation is pure and can be re-run freely.

mod report;

pub use report::{FieldErrors, FieldStatus, MilestoneErrors, ValidationReport};

use crate::draft::DraftProposal;
use crate::types::{Constraints, Milestone};
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use tracing::debug;

/// Minimum cover letter length, in characters after trimming
pub const MIN_COVER_LETTER_CHARS: usize = 20;

/// Validate `draft` against `constraints` using today's local date
pub fn validate(draft: &DraftProposal, constraints: &Constraints) -> ValidationReport {
    validate_as_of(draft, constraints, Local::now().date_naive())
}

/// Validate `draft` as if today were `today`
pub fn validate_as_of(
    draft: &DraftProposal,
    constraints: &Constraints,
    today: NaiveDate,
) -> ValidationReport {
    let mut fields = FieldErrors {
        bid_amount: check_bid_amount(draft.bid_amount, constraints),
        timeline_amount: check_timeline_amount(draft.timeline_amount),
        timeline_unit: if draft.timeline_unit.is_some() {
            FieldStatus::Ok
        } else {
            FieldStatus::error("Timeline unit is required.")
        },
        timeline: check_timeline_ceiling(draft, constraints),
        cover_letter: check_cover_letter(&draft.cover_letter),
        milestones: if draft.milestones.is_empty() {
            FieldStatus::error("At least one milestone is required.")
        } else {
            FieldStatus::Ok
        },
        milestone_total: check_milestone_total(draft),
        ..FieldErrors::default()
    };

    let mut messages: Vec<String> = [
        &fields.bid_amount,
        &fields.timeline_amount,
        &fields.timeline_unit,
        &fields.timeline,
        &fields.cover_letter,
        &fields.milestones,
    ]
    .into_iter()
    .filter_map(FieldStatus::message)
    .map(ToString::to_string)
    .collect();

    for (position, milestone) in draft.milestones.iter().enumerate() {
        let errors = check_milestone(milestone, today);
        if errors.is_clean() {
            continue;
        }
        let number = position + 1;
        messages.extend(errors.messages().map(|m| format!("Milestone {number}: {m}")));
        fields.milestone_items.insert(milestone.id, errors);
    }

    if let Some(message) = fields.milestone_total.message() {
        messages.push(message.to_string());
    }

    debug!("Validated draft: {} problem(s)", messages.len());

    ValidationReport { fields, messages }
}

/// Render an amount without trailing zeros
pub fn format_amount(amount: Decimal) -> String {
    amount.normalize().to_string()
}

fn check_bid_amount(bid: Option<Decimal>, constraints: &Constraints) -> FieldStatus {
    let Some(bid) = bid else {
        return FieldStatus::error("Bid amount is required.");
    };
    if bid <= Decimal::ZERO {
        return FieldStatus::error("Bid amount must be a positive number.");
    }
    if let Some((min, max)) = constraints.budget() {
        if bid < min || bid > max {
            return FieldStatus::error(format!(
                "Bid amount must be between {} and {}.",
                format_amount(min),
                format_amount(max)
            ));
        }
    }
    FieldStatus::Ok
}

fn check_timeline_amount(amount: Option<u32>) -> FieldStatus {
    match amount {
        None => FieldStatus::error("Timeline amount is required."),
        Some(0) => FieldStatus::error("Timeline amount must be greater than 0."),
        Some(_) => FieldStatus::Ok,
    }
}

fn check_timeline_ceiling(draft: &DraftProposal, constraints: &Constraints) -> FieldStatus {
    let ceiling = constraints.original_timeline_in_days;
    if ceiling == 0 {
        return FieldStatus::Ok;
    }
    match draft.timeline_in_days() {
        Some(days) if days > ceiling => {
            let shown = if constraints.original_timeline.trim().is_empty() {
                format!("{ceiling} days")
            } else {
                constraints.original_timeline.clone()
            };
            FieldStatus::error(format!(
                "Your timeline must be equal to or less than the company's timeline ({shown})."
            ))
        }
        _ => FieldStatus::Ok,
    }
}

fn check_cover_letter(cover_letter: &str) -> FieldStatus {
    if cover_letter.trim().chars().count() < MIN_COVER_LETTER_CHARS {
        FieldStatus::error(format!(
            "Cover letter must be at least {MIN_COVER_LETTER_CHARS} characters."
        ))
    } else {
        FieldStatus::Ok
    }
}

fn check_milestone(milestone: &Milestone, today: NaiveDate) -> MilestoneErrors {
    MilestoneErrors {
        title: if milestone.title.trim().is_empty() {
            FieldStatus::error("Title is required.")
        } else {
            FieldStatus::Ok
        },
        description: if milestone.description.trim().is_empty() {
            FieldStatus::error("Description is required.")
        } else {
            FieldStatus::Ok
        },
        amount: match milestone.amount {
            Some(amount) if amount > Decimal::ZERO => FieldStatus::Ok,
            _ => FieldStatus::error("Amount must be greater than 0."),
        },
        due_date: match milestone.due_date {
            None => FieldStatus::error("Due date is required."),
            Some(due) if due < today => FieldStatus::error("Due date cannot be in the past."),
            Some(_) => FieldStatus::Ok,
        },
    }
}

// Only meaningful once the bid itself is usable
fn check_milestone_total(draft: &DraftProposal) -> FieldStatus {
    let Some(bid) = draft.bid_amount.filter(|b| *b > Decimal::ZERO) else {
        return FieldStatus::Ok;
    };
    match draft.milestone_total() {
        Some(total) if total == bid => FieldStatus::Ok,
        Some(total) => FieldStatus::error(format!(
            "Total of milestones (RM {}) must equal your bid amount (RM {}).",
            format_amount(total),
            format_amount(bid)
        )),
        None => FieldStatus::error(format!(
            "Total of milestones is too large and must equal your bid amount (RM {}).",
            format_amount(bid)
        )),
    }
}
