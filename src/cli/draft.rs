//! Draft commands - create and edit a proposal draft on disk

use crate::cli::style::{bullet, check, count, money, Stylize};
use anstream::{eprintln, println};
use bidline::draft::{DraftProposal, MilestonePatch};
use bidline::error::{Error, Result};
use bidline::submit::MAX_ATTACHMENTS;
use bidline::types::{Attachment, Milestone, Opportunity, TimelineUnit};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A draft as stored on disk
///
/// Attachments are kept as paths and read only when submitting.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DraftFile {
    /// The proposal fields
    #[serde(default)]
    pub proposal: DraftProposal,
    /// Files to upload, in attach order
    #[serde(default)]
    pub attachments: Vec<PathBuf>,
}

impl DraftFile {
    /// Read a draft file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let mut file: Self = serde_json::from_str(&text)?;
        file.proposal.resequence();
        Ok(file)
    }

    /// Write the draft file
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text + "\n")?;
        debug!("Saved draft to {}", path.display());
        Ok(())
    }

    /// Build the in-memory draft, reading every attachment
    pub async fn into_draft(self) -> Result<DraftProposal> {
        let mut draft = self.proposal;
        for path in &self.attachments {
            let attachment = Attachment::from_path(path).await.map_err(|e| {
                Error::Io(io::Error::new(
                    e.kind(),
                    format!("cannot read attachment {}: {e}", path.display()),
                ))
            })?;
            draft = draft.add_attachment(attachment);
        }
        Ok(draft)
    }
}

/// Read an opportunity file
pub fn load_opportunity(path: &Path) -> Result<Opportunity> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Write an opportunity file
pub fn save_opportunity(path: &Path, opportunity: &Opportunity) -> Result<()> {
    let text = serde_json::to_string_pretty(opportunity)?;
    fs::write(path, text + "\n")?;
    Ok(())
}

/// Fields for a milestone, as given on the command line
#[derive(Debug, Default)]
pub struct MilestoneArgs {
    /// Title
    pub title: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Amount
    pub amount: Option<Decimal>,
    /// Due date
    pub due: Option<NaiveDate>,
}

/// Convert a 1-based position from the command line to an index
fn index_of(position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .ok_or(Error::MilestoneNotFound(position))
}

/// Report library indices back as command-line positions
fn one_based(err: Error) -> Error {
    match err {
        Error::MilestoneNotFound(index) => Error::MilestoneNotFound(index + 1),
        other => other,
    }
}

fn edit(
    path: &Path,
    transition: impl FnOnce(&DraftProposal) -> Result<DraftProposal>,
) -> Result<DraftFile> {
    let mut file = DraftFile::load(path)?;
    file.proposal = transition(&file.proposal).map_err(one_based)?;
    file.save(path)?;
    Ok(file)
}

fn print_milestones(draft: &DraftProposal) {
    if draft.milestones.is_empty() {
        println!("  {}", "No milestones".muted());
        return;
    }
    for m in &draft.milestones {
        let amount = m.amount.map_or_else(|| "-".to_string(), money);
        let due = m
            .due_date
            .map_or_else(|| "no due date".to_string(), |d| d.to_string());
        println!(
            "  {} {}. {} {} {}",
            bullet(),
            m.sequence,
            m.title,
            amount.accent(),
            due.muted()
        );
    }
    let Some(total) = draft.milestone_total() else {
        println!("  Total {}", "too large to display".warn().for_stdout());
        return;
    };
    match draft.bid_amount {
        Some(bid) if bid == total => {
            println!("  Total {} matches bid {}", money(total).accent(), check());
        }
        Some(bid) => println!(
            "  Total {} of bid {}",
            money(total).accent(),
            money(bid).warn().for_stdout()
        ),
        None => println!("  Total {}", money(total).accent()),
    }
}

/// Run the new command
pub fn run_new(
    path: &Path,
    bid: Option<Decimal>,
    timeline: Option<u32>,
    unit: Option<TimelineUnit>,
    cover_letter: Option<String>,
    force: bool,
) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists (use --force to replace it)", path.display()),
        )));
    }

    let proposal = DraftProposal::new()
        .with_bid_amount(bid)
        .with_timeline(timeline, unit)
        .with_cover_letter(cover_letter.unwrap_or_default());
    DraftFile {
        proposal,
        attachments: Vec::new(),
    }
    .save(path)?;

    println!("{} Created draft {}", check(), path.display().accent());
    Ok(())
}

/// Run the set command
pub fn run_set(
    path: &Path,
    bid: Option<Decimal>,
    timeline: Option<u32>,
    unit: Option<TimelineUnit>,
    cover_letter: Option<String>,
) -> Result<()> {
    edit(path, |draft| {
        let mut next = draft.clone();
        if bid.is_some() {
            next = next.with_bid_amount(bid);
        }
        if timeline.is_some() || unit.is_some() {
            next = next.with_timeline(
                timeline.or(draft.timeline_amount),
                unit.or(draft.timeline_unit),
            );
        }
        if let Some(cover_letter) = cover_letter {
            next = next.with_cover_letter(cover_letter);
        }
        Ok(next)
    })?;
    println!("{} Updated {}", check(), path.display().accent());
    Ok(())
}

/// Run the milestone add command
pub fn run_milestone_add(path: &Path, args: MilestoneArgs) -> Result<()> {
    let milestone = Milestone::new(
        args.title.unwrap_or_default(),
        args.description.unwrap_or_default(),
        args.amount,
        args.due,
    );
    let file = edit(path, |draft| Ok(draft.add_milestone(milestone)))?;
    println!(
        "{} Added milestone {}",
        check(),
        file.proposal.milestones.len().to_string().accent()
    );
    print_milestones(&file.proposal);
    Ok(())
}

/// Run the milestone update command
pub fn run_milestone_update(path: &Path, position: usize, args: MilestoneArgs) -> Result<()> {
    let index = index_of(position)?;
    let mut patch = MilestonePatch::default();
    if let Some(title) = args.title {
        patch = patch.title(title);
    }
    if let Some(description) = args.description {
        patch = patch.description(description);
    }
    if args.amount.is_some() {
        patch = patch.amount(args.amount);
    }
    if args.due.is_some() {
        patch = patch.due_date(args.due);
    }
    if patch.is_empty() {
        eprintln!("{}", "Nothing to update".warn());
        return Ok(());
    }

    let file = edit(path, |draft| draft.update_milestone(index, patch))?;
    println!("{} Updated milestone {}", check(), position.to_string().accent());
    print_milestones(&file.proposal);
    Ok(())
}

/// Run the milestone remove command
pub fn run_milestone_remove(path: &Path, position: usize) -> Result<()> {
    let index = index_of(position)?;
    let file = edit(path, |draft| draft.remove_milestone(index))?;
    println!("{} Removed milestone {}", check(), position.to_string().accent());
    print_milestones(&file.proposal);
    Ok(())
}

/// Run the milestone move command
pub fn run_milestone_move(path: &Path, from: usize, to: usize) -> Result<()> {
    let (from_index, to_index) = (index_of(from)?, index_of(to)?);
    let file = edit(path, |draft| draft.move_milestone(from_index, to_index))?;
    println!(
        "{} Moved milestone {} to {}",
        check(),
        from.to_string().accent(),
        to.to_string().accent()
    );
    print_milestones(&file.proposal);
    Ok(())
}

/// Run the attach command
pub fn run_attach(path: &Path, attachment: &Path) -> Result<()> {
    let metadata = fs::metadata(attachment)?;
    if !metadata.is_file() {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a file", attachment.display()),
        )));
    }

    let mut file = DraftFile::load(path)?;
    file.attachments.push(fs::canonicalize(attachment)?);
    file.save(path)?;

    println!(
        "{} Attached {} ({})",
        check(),
        attachment.display().accent(),
        count(file.attachments.len(), "file")
    );
    if file.attachments.len() > MAX_ATTACHMENTS {
        eprintln!(
            "{}",
            format!("Only {MAX_ATTACHMENTS} attachments can be submitted; detach some before submitting")
                .warn()
        );
    }
    Ok(())
}

/// Run the detach command
pub fn run_detach(path: &Path, position: usize) -> Result<()> {
    let mut file = DraftFile::load(path)?;
    let index = position
        .checked_sub(1)
        .filter(|i| *i < file.attachments.len())
        .ok_or(Error::AttachmentNotFound(position))?;
    let removed = file.attachments.remove(index);
    file.save(path)?;

    println!("{} Detached {}", check(), removed.display().accent());
    Ok(())
}

/// Run the show command
pub fn run_show(path: &Path) -> Result<()> {
    let file = DraftFile::load(path)?;
    let draft = &file.proposal;

    println!("{}", path.display().emphasis());
    let bid = draft.bid_amount.map_or_else(|| "-".to_string(), money);
    println!("  Bid: {}", bid.accent());
    match (draft.timeline_amount, draft.timeline_unit) {
        (Some(amount), Some(unit)) => println!(
            "  Timeline: {} ({} days)",
            unit.describe(amount).accent(),
            unit.to_days(amount)
        ),
        _ => println!("  Timeline: {}", "-".muted()),
    }
    println!(
        "  Cover letter: {}",
        format!("{} characters", draft.cover_letter.chars().count()).muted()
    );
    println!("  {}:", count(draft.milestones.len(), "milestone"));
    print_milestones(draft);
    for attachment in &file.attachments {
        println!("  Attachment: {}", attachment.display().accent());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_draft_file_json_shape() {
        let json = r#"{
            "proposal": {
                "bid_amount": "1000",
                "timeline_amount": 2,
                "timeline_unit": "week",
                "milestones": [
                    {"title": "Design", "description": "Mockups", "amount": "400", "due_date": "2030-01-10"},
                    {"title": "Build", "description": "Code", "amount": "600", "due_date": "2030-01-20"}
                ]
            },
            "attachments": ["brief.pdf"]
        }"#;
        let file: DraftFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.proposal.bid_amount, Some(Decimal::from(1000)));
        assert_eq!(file.proposal.timeline_unit, Some(TimelineUnit::Week));
        assert_eq!(file.proposal.milestones.len(), 2);
        assert_eq!(file.attachments, vec![PathBuf::from("brief.pdf")]);
    }

    #[test]
    fn test_load_resequences_milestones() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("draft.json");
        fs::write(
            &path,
            r#"{"proposal":{"milestones":[{"title":"a","sequence":7},{"title":"b","sequence":7}]}}"#,
        )
        .unwrap();

        let file = DraftFile::load(&path).unwrap();
        let sequences: Vec<u32> = file.proposal.milestones.iter().map(|m| m.sequence).collect();
        assert_eq!(sequences, vec![1, 2]);
    }

    #[test]
    fn test_index_of_is_one_based() {
        assert_eq!(index_of(1).unwrap(), 0);
        assert!(matches!(index_of(0), Err(Error::MilestoneNotFound(0))));
    }

    #[tokio::test]
    async fn test_into_draft_reads_attachments() {
        let dir = TempDir::new().unwrap();
        let brief = dir.path().join("brief.txt");
        fs::write(&brief, b"hello").unwrap();

        let file = DraftFile {
            proposal: DraftProposal::new(),
            attachments: vec![brief],
        };
        let draft = file.into_draft().await.unwrap();
        assert_eq!(draft.attachments.len(), 1);
        assert_eq!(draft.attachments[0].file_name, "brief.txt");
        assert_eq!(draft.attachments[0].size(), 5);
    }
}
