//! Validate command - check a draft without sending it

use crate::cli::draft::{load_opportunity, DraftFile};
use crate::cli::style::{check, count, cross, Stylize};
use anstream::{eprintln, println};
use bidline::error::Result;
use bidline::session::ProposalSession;
use chrono::{Local, NaiveDate};
use std::path::Path;

/// Run the validate command
///
/// Returns whether the draft is clean.
pub fn run_validate(
    path: &Path,
    opportunity: Option<&Path>,
    today: Option<NaiveDate>,
    json: bool,
) -> Result<bool> {
    let file = DraftFile::load(path)?;
    let opportunity = opportunity.map(load_opportunity).transpose()?;
    let session = ProposalSession::with_draft(opportunity, file.proposal);

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let report = session.validate_as_of(today);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(report.is_clean());
    }

    if report.is_clean() {
        println!("{} {}", check(), "Draft is ready to submit".success());
    } else {
        eprintln!(
            "{} {}",
            cross(),
            count(report.messages.len(), "problem").error()
        );
        for message in &report.messages {
            eprintln!("  {message}");
        }
    }

    Ok(report.is_clean())
}
