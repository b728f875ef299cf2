// File: manager/src/config/mod.rs
pub mod manager;
pub mod secrets;

use serde::{Deserialize, Serialize};
pub use manager::ConfigManager;
pub use secrets::Secrets;

use crate::constants::{defaults, scheduler};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// IANA timezone name used for cron evaluation and report formatting
    #[serde(default = "default_timezone")]
    pub timezone: String,
    pub jira: JiraConfig,
    pub slack: SlackConfig,
}

fn default_poll_interval() -> u64 {
    scheduler::DEFAULT_POLL_INTERVAL_SECONDS
}

fn default_timezone() -> String {
    defaults::TIMEZONE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraConfig {
    /// Base URL of the Jira instance, e.g. https://example.atlassian.net
    pub url: String,
    /// Account email paired with the API token for basic auth
    pub email: String,
    /// JQL selecting the open tickets included in handover reports
    pub jql: String,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

fn default_max_results() -> u32 {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Default channel id for handover messages; may be overridden by the
    /// custom_channel_id setting at runtime
    pub channel_id: String,
    #[serde(default = "default_history_lookback")]
    pub history_lookback: u32,
}

fn default_history_lookback() -> u32 {
    scheduler::HISTORY_LOOKBACK
}
