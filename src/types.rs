//! Core types for bidline

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// Unit of a proposed delivery timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineUnit {
    /// Calendar days
    Day,
    /// Weeks of 7 days
    Week,
    /// Months, counted as 30 days
    Month,
}

impl TimelineUnit {
    /// Number of days one unit spans
    pub const fn days(self) -> u32 {
        match self {
            Self::Day => 1,
            Self::Week => 7,
            Self::Month => 30,
        }
    }

    /// Convert `amount` units to a day count (saturating)
    pub const fn to_days(self, amount: u32) -> u32 {
        amount.saturating_mul(self.days())
    }

    /// Human label for `amount` units, e.g. "1 week" or "3 months"
    pub fn describe(self, amount: u32) -> String {
        let noun = match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        };
        if amount == 1 {
            format!("{amount} {noun}")
        } else {
            format!("{amount} {noun}s")
        }
    }
}

impl fmt::Display for TimelineUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => write!(f, "day"),
            Self::Week => write!(f, "week"),
            Self::Month => write!(f, "month"),
        }
    }
}

impl FromStr for TimelineUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "days" => Ok(Self::Day),
            "week" | "weeks" => Ok(Self::Week),
            "month" | "months" => Ok(Self::Month),
            other => Err(format!("unknown timeline unit '{other}' (expected day, week or month)")),
        }
    }
}

/// Stable identity of a milestone within a draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MilestoneId(Uuid);

impl MilestoneId {
    /// Fresh random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MilestoneId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MilestoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A priced, dated sub-deliverable of a proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// Stable identity, assigned on creation
    #[serde(default)]
    pub id: MilestoneId,
    /// 1-based position in the draft; maintained by the sequencer
    #[serde(default)]
    pub sequence: u32,
    /// Short title
    #[serde(default)]
    pub title: String,
    /// What gets delivered
    #[serde(default)]
    pub description: String,
    /// Price of this milestone
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Delivery date
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl Milestone {
    /// Create a milestone with a fresh id and a placeholder sequence
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        amount: Option<Decimal>,
        due_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: MilestoneId::new(),
            sequence: 0,
            title: title.into(),
            description: description.into(),
            amount,
            due_date,
        }
    }
}

/// A file attached to a proposal
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File name sent to the endpoint
    pub file_name: String,
    /// Raw file contents, shared between draft revisions
    pub data: Arc<[u8]>,
}

impl Attachment {
    /// Create an attachment from in-memory bytes
    pub fn new(file_name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            file_name: file_name.into(),
            data: data.into(),
        }
    }

    /// Read an attachment from disk
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self {
            file_name,
            data: data.into(),
        })
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("size", &self.data.len())
            .finish()
    }
}

/// Constraints a client puts on proposals for an opportunity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints {
    /// Lowest acceptable bid (inclusive)
    #[serde(default)]
    pub budget_min: Option<Decimal>,
    /// Highest acceptable bid (inclusive)
    #[serde(default)]
    pub budget_max: Option<Decimal>,
    /// Client's timeline as shown to providers, e.g. "1 month"
    #[serde(default)]
    pub original_timeline: String,
    /// Ceiling for the provider's timeline in days; 0 means unconstrained
    #[serde(default)]
    pub original_timeline_in_days: u32,
}

impl Constraints {
    /// Both budget bounds, when the client supplied them
    pub fn budget(&self) -> Option<(Decimal, Decimal)> {
        match (self.budget_min, self.budget_max) {
            (Some(min), Some(max)) => Some((min, max)),
            _ => None,
        }
    }
}

/// A client-posted request providers bid on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opportunity {
    /// Backend identifier
    pub id: String,
    /// Title shown in listings
    #[serde(default)]
    pub title: String,
    /// Budget and timeline constraints
    #[serde(flatten)]
    pub constraints: Constraints,
    /// Whether the current provider already proposed
    #[serde(default)]
    pub has_submitted: bool,
    /// Number of proposals received
    #[serde(default)]
    pub proposals: u32,
}

impl Opportunity {
    /// Note that the current provider's proposal was accepted
    ///
    /// Returns `false` if it was already recorded.
    pub const fn record_submission(&mut self) -> bool {
        if self.has_submitted {
            return false;
        }
        self.has_submitted = true;
        self.proposals = self.proposals.saturating_add(1);
        true
    }
}
