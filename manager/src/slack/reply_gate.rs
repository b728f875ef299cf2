//! Channel reply gate.
//!
//! Decides whether the periodic handover reply has already happened by
//! scanning the channel's own message history rather than trusting local
//! state: the anchor message and its replies can be affected by manual
//! intervention, so the remote channel is the source of truth for
//! "already replied".

use tracing::{debug, info};

use crate::constants::scheduler::HANDOVER_MARKER;

use super::SlackClient;

/// Result of one anchor scan. `error` carries a fetch failure reason for the
/// caller to log; a failed scan reports `found: false` and is retried on the
/// next poll cycle rather than inline.
#[derive(Debug, Clone)]
pub struct AnchorScan {
    pub found: bool,
    pub timestamp: Option<String>,
    pub has_replies: bool,
    pub error: Option<String>,
}

impl AnchorScan {
    fn not_found() -> Self {
        Self {
            found: false,
            timestamp: None,
            has_replies: false,
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            found: false,
            timestamp: None,
            has_replies: false,
            error: Some(error),
        }
    }
}

/// Scan the most recent `lookback` channel messages for the handover anchor
/// and determine whether its thread already has replies.
pub async fn find_anchor(slack: &SlackClient, channel: &str, lookback: u32) -> AnchorScan {
    let history = slack.get_history(channel, lookback).await;
    if !history.ok {
        return AnchorScan::failed(format!(
            "failed to fetch channel history: {}",
            history.error.unwrap_or_else(|| "unknown error".to_string())
        ));
    }

    // History is newest-first, so the first marker hit is the latest anchor
    let anchor = history
        .messages
        .unwrap_or_default()
        .into_iter()
        .find(|msg| {
            msg.text
                .as_deref()
                .map(|text| text.contains(HANDOVER_MARKER))
                .unwrap_or(false)
        });

    let anchor = match anchor {
        Some(msg) => msg,
        None => {
            debug!("No handover anchor found in the last {} messages", lookback);
            return AnchorScan::not_found();
        }
    };

    let replies = slack.get_thread_replies(&anchor.ts, channel).await;
    if !replies.ok {
        return AnchorScan::failed(format!(
            "failed to fetch thread replies for {}: {}",
            anchor.ts,
            replies.error.unwrap_or_else(|| "unknown error".to_string())
        ));
    }

    // The thread includes its root message, so len > 1 means replied
    let reply_count = replies.messages.map(|m| m.len()).unwrap_or(0);
    let has_replies = reply_count > 1;

    info!(
        "Found handover anchor {} (thread messages: {}, has replies: {})",
        anchor.ts, reply_count, has_replies
    );

    AnchorScan {
        found: true,
        timestamp: Some(anchor.ts),
        has_replies,
        error: None,
    }
}
