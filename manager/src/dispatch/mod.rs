//! Handover dispatch coordination.
//!
//! One "scan and reply" cycle: validate configuration, locate the anchor
//! message via the channel reply gate, and - if due and not yet replied -
//! render the ticket report and post it as a threaded reply, committing fire
//! state only after Slack confirmed the post.
//!
//! Dedup state is reconstructed from the remote channel on every cycle; a
//! cycle lock removes the in-process scan-then-post race. Two separate
//! processes can still both reply (first reply wins in the channel) - an
//! accepted limitation, visible but harmless.

pub mod render;

pub use render::{render_anchor_message, render_handover_reply, TicketReportEntry};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::config::{Config, Secrets};
use crate::database::{CommentType, Database};
use crate::jira::JiraClient;
use crate::slack::{find_anchor, SlackClient};

/// Terminal outcome of one dispatch cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchResult {
    /// Preconditions not met; nothing was posted and nothing committed
    Skipped { reason: String },
    /// The reply was posted and fire state committed
    Replied {
        anchor_ts: String,
        reply_ts: String,
        ticket_count: usize,
    },
    /// A remote call failed; the anchor remains replyless so the next poll
    /// cycle retries
    Failed { reason: String },
}

pub struct HandoverDispatcher {
    config: Arc<Config>,
    secrets: Arc<Secrets>,
    database: Arc<Database>,
    slack: Arc<SlackClient>,
    jira: Arc<JiraClient>,
    // Serializes scan-then-post so overlapping in-process cycles cannot
    // both observe "no replies" before either posts
    cycle_lock: Mutex<()>,
}

impl HandoverDispatcher {
    pub fn new(
        config: Arc<Config>,
        secrets: Arc<Secrets>,
        database: Arc<Database>,
        slack: Arc<SlackClient>,
        jira: Arc<JiraClient>,
    ) -> Self {
        Self {
            config,
            secrets,
            database,
            slack,
            jira,
            cycle_lock: Mutex::new(()),
        }
    }

    /// Run one scan-and-reply cycle
    pub async fn scan_and_reply(&self) -> DispatchResult {
        let _guard = self.cycle_lock.lock().await;
        let result = self.run_cycle().await;

        match &result {
            DispatchResult::Skipped { reason } => {
                info!("Handover dispatch skipped: {}", reason);
            }
            DispatchResult::Replied {
                anchor_ts,
                reply_ts,
                ticket_count,
            } => {
                info!(
                    "Handover reply posted under {} (reply ts {}, {} tickets)",
                    anchor_ts, reply_ts, ticket_count
                );
            }
            DispatchResult::Failed { reason } => {
                error!("Handover dispatch failed: {}", reason);
            }
        }

        result
    }

    async fn run_cycle(&self) -> DispatchResult {
        // Step 1: validate configuration
        if !self.secrets.has_slack_user_token() {
            return DispatchResult::Skipped {
                reason: "not configured: missing Slack user token".to_string(),
            };
        }

        let slack_schedules = match self.database.get_enabled_scheduled_comments().await {
            Ok(schedules) => schedules
                .into_iter()
                .filter(|s| s.comment_type == CommentType::Slack)
                .collect::<Vec<_>>(),
            Err(e) => {
                return DispatchResult::Failed {
                    reason: format!("failed to load schedules: {}", e),
                };
            }
        };

        if slack_schedules.is_empty() {
            return DispatchResult::Skipped {
                reason: "not configured: no enabled slack schedules".to_string(),
            };
        }

        let channel = match self.database.get_custom_channel_id().await {
            Ok(Some(custom)) => custom,
            Ok(None) => self.config.slack.channel_id.clone(),
            Err(e) => {
                warn!("Failed to read custom channel setting, using default: {}", e);
                self.config.slack.channel_id.clone()
            }
        };

        // Step 2: locate the anchor via the reply gate
        let scan = find_anchor(&self.slack, &channel, self.config.slack.history_lookback).await;

        if let Some(error) = scan.error {
            return DispatchResult::Failed { reason: error };
        }
        if !scan.found {
            return DispatchResult::Skipped {
                reason: "no anchor message found".to_string(),
            };
        }
        if scan.has_replies {
            return DispatchResult::Skipped {
                reason: "anchor already has replies".to_string(),
            };
        }
        let anchor_ts = scan.timestamp.unwrap_or_default();

        // Step 3: render the report from current domain data
        let tickets = match self.jira.fetch_open_tickets().await {
            Ok(tickets) => tickets,
            Err(e) => {
                return DispatchResult::Failed {
                    reason: format!("failed to fetch tickets: {}", e),
                };
            }
        };

        let notes = match self.database.get_ticket_notes_map().await {
            Ok(notes) => notes,
            Err(e) => {
                return DispatchResult::Failed {
                    reason: format!("failed to load ticket notes: {}", e),
                };
            }
        };

        let entries: Vec<TicketReportEntry> = tickets
            .into_iter()
            .map(|ticket| {
                let note = notes.get(&ticket.key);
                TicketReportEntry {
                    key: ticket.key.clone(),
                    summary: ticket.summary,
                    wl_main_type: ticket.wl_main_type,
                    wl_sub_type: ticket.wl_sub_type,
                    saved_status: note
                        .map(|n| n.status.clone())
                        .filter(|s| !s.is_empty())
                        .unwrap_or_else(|| "--".to_string()),
                    saved_action: note
                        .map(|n| n.action.clone())
                        .filter(|a| !a.is_empty())
                        .unwrap_or_else(|| "--".to_string()),
                }
            })
            .collect();

        let mentions = self.database.get_member_mentions().await.unwrap_or(None);
        let reply = render_handover_reply(&entries, mentions.as_deref(), self.jira.base_url());

        // Step 4: post the threaded reply
        let response = self
            .slack
            .post_thread_reply(&reply, &anchor_ts, &channel, Some(self.slack.user_token()))
            .await;

        if !response.ok {
            return DispatchResult::Failed {
                reason: format!(
                    "failed to post reply: {}",
                    response.error.unwrap_or_else(|| "unknown error".to_string())
                ),
            };
        }

        // Step 5: commit fire state, only now that Slack confirmed the post.
        // A commit failure is logged but the cycle still counts as replied;
        // the worst case is one extra reply attempt next cycle, which the
        // reply gate will then skip.
        let posted_at = Utc::now();
        for schedule in &slack_schedules {
            if let Err(e) = self.database.mark_comment_posted(&schedule.id, posted_at).await {
                error!(
                    "Failed to commit fire state for schedule {}: {}",
                    schedule.id, e
                );
            }
        }

        DispatchResult::Replied {
            anchor_ts,
            reply_ts: response.ts.unwrap_or_default(),
            ticket_count: entries.len(),
        }
    }
}
