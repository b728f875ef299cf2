//! Application-wide constants for timeouts, limits, and scheduler behavior
//!
//! Central repository for all configuration constants and magic values,
//! organized by category.

#![allow(dead_code)] // Some constants are defined for future use

use std::time::Duration;

/// HTTP client timeout constants
pub mod http {
    use super::Duration;

    /// Timeout for Slack Web API requests
    pub const SLACK_TIMEOUT: Duration = Duration::from_secs(10);

    /// Timeout for Jira REST API requests
    pub const JIRA_TIMEOUT: Duration = Duration::from_secs(30);

    /// Timeout for establishing HTTP connections
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
}

/// Scheduler constants
pub mod scheduler {
    /// Default interval between poller ticks (seconds)
    pub const DEFAULT_POLL_INTERVAL_SECONDS: u64 = 60;

    /// Minimum spacing between two firings of the same schedule (seconds).
    /// Combined with per-minute cron granularity this prevents a schedule
    /// from firing twice inside one matching minute.
    pub const MIN_FIRE_SPACING_SECONDS: i64 = 60;

    /// How many recent channel messages to scan when looking for the
    /// handover anchor message
    pub const HISTORY_LOOKBACK: u32 = 10;

    /// Marker text identifying the handover anchor message in the channel
    pub const HANDOVER_MARKER: &str = "*Ticket Handover Information*";
}

/// Keys in the global_settings table
pub mod settings {
    /// Global kill-switch for all scheduled activity ("true"/"false")
    pub const SCHEDULER_ENABLED: &str = "scheduler_enabled";

    /// Evening shift trigger time, "HH:MM"
    pub const TRIGGER_TIME_1: &str = "trigger_time_1";

    /// Night shift trigger time, "HH:MM"
    pub const TRIGGER_TIME_2: &str = "trigger_time_2";

    /// Slack user token used to post the evening handover message
    pub const EVENING_USER_TOKEN: &str = "evening_user_token";

    /// Slack user token used to post the night handover message
    pub const NIGHT_USER_TOKEN: &str = "night_user_token";

    /// Last time the evening shift handover fired (RFC 3339)
    pub const EVENING_LAST_FIRED: &str = "evening_last_fired_at";

    /// Last time the night shift handover fired (RFC 3339)
    pub const NIGHT_LAST_FIRED: &str = "night_last_fired_at";

    /// Optional channel id overriding the configured default
    pub const CUSTOM_CHANNEL_ID: &str = "custom_channel_id";

    /// Optional mention string prepended to handover replies
    pub const MEMBER_MENTIONS: &str = "member_mentions";
}

/// Default shift trigger times, used when not configured
pub mod defaults {
    pub const TRIGGER_TIME_1: &str = "17:00";
    pub const TRIGGER_TIME_2: &str = "23:00";
    pub const TIMEZONE: &str = "Asia/Taipei";
}
