//! Test data factories for bidline types
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use bidline::draft::DraftProposal;
use bidline::types::{Attachment, Milestone, Opportunity, TimelineUnit};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Fixed "today" so due-date checks are deterministic
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()
}

/// A date `days` after [`today`]
pub fn days_from_today(days: u64) -> NaiveDate {
    today() + chrono::Days::new(days)
}

/// Whole-number amount
pub fn rm(amount: i64) -> Decimal {
    Decimal::from(amount)
}

/// Opportunity with a 5000-10000 budget and a one-month timeline
pub fn make_opportunity(id: &str) -> Opportunity {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "title": "Company website redesign",
        "budget_min": "5000",
        "budget_max": "10000",
        "original_timeline": "1 month",
        "original_timeline_in_days": 30,
        "has_submitted": false,
        "proposals": 3
    }))
    .unwrap()
}

/// Opportunity without budget or timeline constraints
pub fn make_open_opportunity(id: &str) -> Opportunity {
    serde_json::from_value(serde_json::json!({ "id": id })).unwrap()
}

/// Complete milestone due `days` after today
pub fn make_milestone(title: &str, amount: i64, days: u64) -> Milestone {
    Milestone::new(
        title,
        format!("{title} deliverables"),
        Some(rm(amount)),
        Some(days_from_today(days)),
    )
}

/// Draft that passes validation against [`make_opportunity`]
pub fn valid_draft() -> DraftProposal {
    DraftProposal::new()
        .with_bid_amount(Some(rm(6000)))
        .with_timeline(Some(3), Some(TimelineUnit::Week))
        .with_cover_letter("We have shipped a dozen marketing sites like this one.")
        .add_milestone(make_milestone("Design", 2500, 7))
        .add_milestone(make_milestone("Build", 3500, 20))
}

/// Draft with only a bid and the given milestone amounts
pub fn draft_with_amounts(bid: i64, amounts: &[i64]) -> DraftProposal {
    amounts
        .iter()
        .enumerate()
        .fold(
            DraftProposal::new().with_bid_amount(Some(rm(bid))),
            |draft, (i, amount)| draft.add_milestone(make_milestone(&format!("Step {}", i + 1), *amount, 5)),
        )
}

/// Attachment of `size` zero bytes
pub fn make_attachment(name: &str, size: usize) -> Attachment {
    Attachment::new(name, vec![0u8; size])
}
