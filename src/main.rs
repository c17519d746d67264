//! bidline - marketplace proposals from the command line
//!
//! CLI binary for drafting, validating and submitting proposals.

use anyhow::Result;
use bidline::types::TimelineUnit;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;

#[derive(Parser)]
#[command(name = "bidline")]
#[command(about = "Draft, validate and submit marketplace proposals")]
#[command(version)]
struct Cli {
    /// Marketplace API base URL (overrides BIDLINE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// API token (overrides BIDLINE_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ProposalFields {
    /// Total bid amount
    #[arg(long)]
    bid: Option<Decimal>,

    /// Delivery timeline length
    #[arg(long)]
    timeline: Option<u32>,

    /// Timeline unit: day, week or month
    #[arg(long)]
    unit: Option<TimelineUnit>,

    /// Cover letter text
    #[arg(long)]
    cover_letter: Option<String>,
}

#[derive(Args)]
struct MilestoneFields {
    /// Milestone title
    #[arg(long)]
    title: Option<String>,

    /// What the milestone delivers
    #[arg(long)]
    description: Option<String>,

    /// Milestone amount
    #[arg(long)]
    amount: Option<Decimal>,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    due: Option<NaiveDate>,
}

impl From<MilestoneFields> for cli::MilestoneArgs {
    fn from(fields: MilestoneFields) -> Self {
        Self {
            title: fields.title,
            description: fields.description,
            amount: fields.amount,
            due: fields.due,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new draft file
    New {
        /// Draft file to create
        draft: PathBuf,

        #[command(flatten)]
        fields: ProposalFields,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Change bid, timeline or cover letter of a draft
    Set {
        /// Draft file
        draft: PathBuf,

        #[command(flatten)]
        fields: ProposalFields,
    },

    /// Print a draft
    Show {
        /// Draft file
        draft: PathBuf,
    },

    /// Edit milestones
    Milestone {
        #[command(subcommand)]
        action: MilestoneAction,
    },

    /// Attach a file to a draft
    Attach {
        /// Draft file
        draft: PathBuf,
        /// File to attach
        file: PathBuf,
    },

    /// Remove an attachment by position (1-based)
    Detach {
        /// Draft file
        draft: PathBuf,
        /// Attachment position
        position: usize,
    },

    /// Check a draft against an opportunity's constraints
    Validate {
        /// Draft file
        draft: PathBuf,

        /// Opportunity file
        #[arg(long)]
        opportunity: Option<PathBuf>,

        /// Judge due dates as of this date instead of today
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Submit a draft proposal
    Submit {
        /// Draft file
        draft: PathBuf,

        /// Opportunity file
        #[arg(long)]
        opportunity: Option<PathBuf>,

        /// Dry run - show what would be sent without sending
        #[arg(long)]
        dry_run: bool,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,

        /// Keep the draft file after a successful submission
        #[arg(long)]
        keep_draft: bool,
    },

    /// Authentication management
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[derive(Subcommand)]
enum MilestoneAction {
    /// Append a milestone
    Add {
        /// Draft file
        draft: PathBuf,
        #[command(flatten)]
        fields: MilestoneFields,
    },
    /// Change fields of the milestone at a position (1-based)
    Update {
        /// Draft file
        draft: PathBuf,
        /// Milestone position
        position: usize,
        #[command(flatten)]
        fields: MilestoneFields,
    },
    /// Remove the milestone at a position (1-based)
    Remove {
        /// Draft file
        draft: PathBuf,
        /// Milestone position
        position: usize,
    },
    /// Move a milestone to another position (1-based)
    Move {
        /// Draft file
        draft: PathBuf,
        /// Current position
        from: usize,
        /// New position
        to: usize,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Test authentication
    Test,
    /// Show authentication setup instructions
    Setup,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api_url = cli.api_url.as_deref();
    let token = cli.token.as_deref();

    match cli.command {
        Commands::New {
            draft,
            fields,
            force,
        } => {
            cli::run_new(
                &draft,
                fields.bid,
                fields.timeline,
                fields.unit,
                fields.cover_letter,
                force,
            )?;
        }
        Commands::Set { draft, fields } => {
            cli::run_set(
                &draft,
                fields.bid,
                fields.timeline,
                fields.unit,
                fields.cover_letter,
            )?;
        }
        Commands::Show { draft } => cli::run_show(&draft)?,
        Commands::Milestone { action } => match action {
            MilestoneAction::Add { draft, fields } => {
                cli::run_milestone_add(&draft, fields.into())?;
            }
            MilestoneAction::Update {
                draft,
                position,
                fields,
            } => cli::run_milestone_update(&draft, position, fields.into())?,
            MilestoneAction::Remove { draft, position } => {
                cli::run_milestone_remove(&draft, position)?;
            }
            MilestoneAction::Move { draft, from, to } => {
                cli::run_milestone_move(&draft, from, to)?;
            }
        },
        Commands::Attach { draft, file } => cli::run_attach(&draft, &file)?,
        Commands::Detach { draft, position } => cli::run_detach(&draft, position)?,
        Commands::Validate {
            draft,
            opportunity,
            today,
            json,
        } => {
            if !cli::run_validate(&draft, opportunity.as_deref(), today, json)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Submit {
            draft,
            opportunity,
            dry_run,
            yes,
            keep_draft,
        } => {
            let options = cli::SubmitOptions {
                opportunity: opportunity.as_deref(),
                dry_run,
                yes,
                keep_draft,
                api_url,
                token,
            };
            cli::run_submit(&draft, options).await?;
        }
        Commands::Auth { action } => match action {
            AuthAction::Test => cli::run_auth_test(api_url, token).await?,
            AuthAction::Setup => cli::run_auth_setup(),
        },
    }

    Ok(ExitCode::SUCCESS)
}
