//! Common test data builders

use serde_json::{json, Value};

pub const ANCHOR_MARKER: &str = "*Ticket Handover Information*";

/// A channel history message carrying the handover anchor marker
pub fn anchor_message(ts: &str) -> Value {
    json!({
        "ts": ts,
        "text": format!("{}\nMonday, 2 March 2026 - evening shift handover", ANCHOR_MARKER)
    })
}

/// An unrelated channel chatter message
pub fn chatter_message(ts: &str) -> Value {
    json!({
        "ts": ts,
        "text": "lunch anyone?"
    })
}

/// A Jira search issue with WL classification fields populated
pub fn jira_issue(key: &str, summary: &str, main_type: &str, sub_type: &str) -> Value {
    json!({
        "key": key,
        "fields": {
            "summary": summary,
            "customfield_10451": { "value": main_type },
            "customfield_10453": { "value": sub_type }
        }
    })
}

/// A Jira search issue with no classification set
pub fn jira_issue_unclassified(key: &str, summary: &str) -> Value {
    json!({
        "key": key,
        "fields": {
            "summary": summary,
            "customfield_10451": null,
            "customfield_10453": null
        }
    })
}
