//! Database record types (entities).
//!
//! This module contains all the record structs used by the database layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of action a scheduled comment performs when due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentType {
    /// Post a comment on a Jira ticket
    Jira,
    /// Reply to the handover thread in Slack
    Slack,
}

impl CommentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentType::Jira => "jira",
            CommentType::Slack => "slack",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "jira" => Some(CommentType::Jira),
            "slack" => Some(CommentType::Slack),
            _ => None,
        }
    }
}

/// A named periodic action: cron expression plus target payload.
/// `last_posted_at` is only advanced after the action confirmed success,
/// and never moves backwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledCommentRecord {
    pub id: String,
    pub comment_type: CommentType,
    /// Target ticket for jira-type schedules; None for slack-type
    pub ticket_key: Option<String>,
    pub comment_text: String,
    pub cron_schedule: String,
    pub enabled: bool,
    pub last_posted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Operator-entered annotation for a ticket, merged into handover reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketNoteRecord {
    pub ticket_key: String,
    pub status: String,
    pub action: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalSettingRecord {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}
