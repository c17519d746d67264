//! Wire shape of a proposal submission

use crate::types::{Attachment, TimelineUnit};
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Timeline reduced to a day count plus a display label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalTimeline {
    /// Total days
    pub days: u32,
    /// Label such as "2 weeks"
    pub display: String,
}

impl CanonicalTimeline {
    /// Canonical form of `amount` `unit`s
    pub fn new(amount: u32, unit: TimelineUnit) -> Self {
        Self {
            days: unit.to_days(amount),
            display: unit.describe(amount),
        }
    }
}

/// One milestone as the endpoint receives it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MilestonePayload {
    /// 1-based position
    pub sequence: u32,
    /// Trimmed title
    pub title: String,
    /// Description
    pub description: String,
    /// Price
    pub amount: Decimal,
    /// Due date as a full timestamp
    pub due_date: DateTime<Utc>,
}

/// Normalized proposal ready to send
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProposalPayload {
    /// Opportunity being proposed against
    pub opportunity_id: String,
    /// Total bid
    pub bid_amount: Decimal,
    /// Delivery timeline
    pub timeline: CanonicalTimeline,
    /// Cover letter
    pub cover_letter: String,
    /// Milestones in order
    pub milestones: Vec<MilestonePayload>,
    /// Files sent as `attachments` parts
    #[serde(skip)]
    pub attachments: Vec<Attachment>,
}

impl ProposalPayload {
    /// Text fields of the multipart form, in send order
    ///
    /// Milestones are flattened as `milestones[i][field]`.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("referenceId".to_string(), self.opportunity_id.clone()),
            ("bidAmount".to_string(), self.bid_amount.normalize().to_string()),
            ("deliveryTime".to_string(), self.timeline.display.clone()),
            ("timeline".to_string(), self.timeline.display.clone()),
            ("timelineInDays".to_string(), self.timeline.days.to_string()),
            ("coverLetter".to_string(), self.cover_letter.clone()),
        ];

        for (i, m) in self.milestones.iter().enumerate() {
            fields.push((format!("milestones[{i}][sequence]"), m.sequence.to_string()));
            fields.push((format!("milestones[{i}][title]"), m.title.clone()));
            fields.push((format!("milestones[{i}][description]"), m.description.clone()));
            fields.push((format!("milestones[{i}][amount]"), m.amount.normalize().to_string()));
            fields.push((
                format!("milestones[{i}][dueDate]"),
                m.due_date.to_rfc3339_opts(SecondsFormat::Millis, true),
            ));
        }

        fields
    }

    /// Names of attached files
    pub fn attachment_names(&self) -> Vec<&str> {
        self.attachments.iter().map(|a| a.file_name.as_str()).collect()
    }
}
