//! Submit command - send a draft proposal to the marketplace

use crate::cli::draft::{load_opportunity, save_opportunity, DraftFile};
use crate::cli::progress::CliProgress;
use crate::cli::style::{money, Stylize};
use anstream::{eprintln, println};
use async_trait::async_trait;
use bidline::config::ClientConfig;
use bidline::error::{Error, Result};
use bidline::service::{create_proposal_service, ProposalService, SubmissionResponse};
use bidline::session::ProposalSession;
use bidline::submit::{ProposalPayload, SubmissionOutcome};
use dialoguer::Confirm;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Stand-in service for dry runs, which never reach the endpoint
struct DryRunService;

#[async_trait]
impl ProposalService for DryRunService {
    async fn submit_proposal(&self, _payload: &ProposalPayload) -> Result<SubmissionResponse> {
        Err(Error::Internal("dry run attempted to send".to_string()))
    }
}

/// Options for the submit command
#[derive(Debug, Default)]
pub struct SubmitOptions<'a> {
    /// Opportunity file; rewritten after a successful submission
    pub opportunity: Option<&'a Path>,
    /// Print the payload instead of sending
    pub dry_run: bool,
    /// Skip the confirmation prompt
    pub yes: bool,
    /// Leave the draft file in place after success
    pub keep_draft: bool,
    /// `--api-url` override
    pub api_url: Option<&'a str>,
    /// `--token` override
    pub token: Option<&'a str>,
}

/// Run the submit command
pub async fn run_submit(path: &Path, options: SubmitOptions<'_>) -> Result<()> {
    let draft = DraftFile::load(path)?.into_draft().await?;
    let opportunity = options.opportunity.map(load_opportunity).transpose()?;

    if let Some(opp) = opportunity.as_ref().filter(|o| o.has_submitted) {
        eprintln!(
            "{}",
            format!("You already submitted a proposal for {}", opp.id).warn()
        );
    }

    let mut session = ProposalSession::with_draft(opportunity, draft);

    let service: Box<dyn ProposalService> = if options.dry_run {
        Box::new(DryRunService)
    } else {
        let config = ClientConfig::load(options.api_url)?;
        create_proposal_service(&config, options.token)?
    };

    if !options.dry_run && !options.yes && session.validate().is_clean() && !confirm(&session)? {
        println!("{}", "Submission cancelled".muted());
        return Ok(());
    }

    let progress = CliProgress::new();
    let outcome = session
        .submit(service.as_ref(), &progress, options.dry_run)
        .await?;

    if let SubmissionOutcome::Submitted(_) = outcome {
        if let (Some(file), Some(opp)) = (options.opportunity, session.opportunity()) {
            save_opportunity(file, opp)?;
            debug!("Recorded submission in {}", file.display());
        }
        if !options.keep_draft {
            fs::remove_file(path)?;
            println!("  {}", format!("Draft {} cleared", path.display()).muted());
        }
    }

    Ok(())
}

fn confirm(session: &ProposalSession) -> Result<bool> {
    let bid = session
        .draft()
        .bid_amount
        .map_or_else(|| "-".to_string(), money);
    let target = session
        .opportunity()
        .map_or_else(String::new, |o| {
            if o.title.is_empty() {
                format!(" for {}", o.id)
            } else {
                format!(" for \"{}\"", o.title)
            }
        });

    Confirm::new()
        .with_prompt(format!("Submit proposal of {bid}{target}?"))
        .default(false)
        .interact()
        .map_err(|e| Error::Internal(format!("confirmation prompt failed: {e}")))
}
