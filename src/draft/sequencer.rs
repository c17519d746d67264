//! Milestone sequencer
//!
//! Structural edits on the milestone list. Every operation leaves
//! `milestones[i].sequence == i + 1`.

use crate::error::{Error, Result};
use crate::types::Milestone;
use tracing::debug;

/// Renumber every milestone 1..N by list position
pub fn resequence(milestones: &mut [Milestone]) {
    for (position, milestone) in milestones.iter_mut().enumerate() {
        milestone.sequence = u32::try_from(position + 1).unwrap_or(u32::MAX);
    }
}

/// Whether sequence numbers are exactly 1..N in list order
pub fn is_dense(milestones: &[Milestone]) -> bool {
    milestones
        .iter()
        .enumerate()
        .all(|(position, m)| usize::try_from(m.sequence).is_ok_and(|s| s == position + 1))
}

/// Append a milestone and renumber
pub fn add(milestones: &mut Vec<Milestone>, milestone: Milestone) {
    milestones.push(milestone);
    resequence(milestones);
    debug!("Added milestone, {} in list", milestones.len());
}

/// Apply `edit` to the milestone at `index` and renumber
pub fn update<F>(milestones: &mut [Milestone], index: usize, edit: F) -> Result<()>
where
    F: FnOnce(&mut Milestone),
{
    let milestone = milestones
        .get_mut(index)
        .ok_or(Error::MilestoneNotFound(index))?;
    edit(milestone);
    resequence(milestones);
    Ok(())
}

/// Remove the milestone at `index` and close the gap
pub fn remove(milestones: &mut Vec<Milestone>, index: usize) -> Result<Milestone> {
    if index >= milestones.len() {
        return Err(Error::MilestoneNotFound(index));
    }
    let removed = milestones.remove(index);
    resequence(milestones);
    debug!("Removed milestone {}, {} left", removed.sequence, milestones.len());
    Ok(removed)
}

/// Move the milestone at `from` so it ends up at `to`, then renumber
pub fn reorder(milestones: &mut Vec<Milestone>, from: usize, to: usize) -> Result<()> {
    let len = milestones.len();
    if from >= len {
        return Err(Error::MilestoneNotFound(from));
    }
    if to >= len {
        return Err(Error::MilestoneNotFound(to));
    }
    let item = milestones.remove(from);
    milestones.insert(to, item);
    resequence(milestones);
    Ok(())
}
