//! Shared CLI progress callback with styled output and spinners

use crate::cli::style::{arrow, bullet, check, count, cross, money, spinner_style, Stylize};
use anstream::{eprintln, println};
use async_trait::async_trait;
use bidline::error::Error;
use bidline::submit::{Phase, ProgressCallback, ProposalPayload, ProposalSubmitted};
use indicatif::ProgressBar;
use std::sync::Mutex;
use std::time::Duration;

/// CLI progress callback that prints to stdout with styled output
///
/// A spinner runs while the endpoint call is in flight.
#[derive(Default)]
pub struct CliProgress {
    spinner: Mutex<Option<ProgressBar>>,
}

impl CliProgress {
    /// Create a progress printer
    pub const fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn start_spinner(&self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(spinner);
        }
    }

    fn stop_spinner(&self) {
        if let Some(spinner) = self.spinner.lock().ok().and_then(|mut slot| slot.take()) {
            spinner.finish_and_clear();
        }
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_phase(&self, phase: Phase) {
        match phase {
            Phase::Validating => println!("{}...", phase.to_string().emphasis()),
            Phase::Submitting => self.start_spinner("Submitting proposal..."),
            Phase::Complete => self.stop_spinner(),
        }
    }

    async fn on_payload(&self, payload: &ProposalPayload) {
        println!(
            "{} Would submit {} for {}",
            arrow(),
            money(payload.bid_amount).accent(),
            payload.opportunity_id.emphasis()
        );
        println!(
            "  Timeline: {} ({} days)",
            payload.timeline.display,
            payload.timeline.days
        );
        println!("  {}:", count(payload.milestones.len(), "milestone"));
        for m in &payload.milestones {
            println!(
                "    {} {}. {} {} {}",
                bullet(),
                m.sequence,
                m.title,
                money(m.amount).accent(),
                m.due_date.format("%Y-%m-%d").to_string().muted()
            );
        }
        for name in payload.attachment_names() {
            println!("  Attachment: {}", name.accent());
        }
    }

    async fn on_submitted(&self, event: &ProposalSubmitted) {
        self.stop_spinner();
        println!(
            "{} Proposal submitted for {}",
            check(),
            event.opportunity_id.emphasis()
        );
        if let Some(message) = &event.message {
            println!("  {}", message.muted());
        }
    }

    async fn on_error(&self, err: &Error) {
        self.stop_spinner();
        // Details are printed once, by main
        let summary = if err.is_local() {
            "Proposal not submitted"
        } else {
            "Submission failed"
        };
        eprintln!("{} {}", cross(), summary.error());
    }

    async fn on_message(&self, message: &str) {
        println!("{}", message.muted());
    }
}
