//! Test configuration builders

use std::sync::Arc;

use manager::config::{Config, JiraConfig, Secrets, SlackConfig};

/// Builder for test configurations pointing at mock servers
pub struct TestConfigBuilder {
    host: String,
    port: u16,
    timezone: String,
    jira_url: String,
    channel_id: String,
    history_lookback: u32,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            timezone: "Asia/Taipei".to_string(),
            jira_url: "http://localhost:9".to_string(),
            channel_id: "C0TEST".to_string(),
            history_lookback: 10,
        }
    }

    pub fn with_jira_url(mut self, url: &str) -> Self {
        self.jira_url = url.to_string();
        self
    }

    pub fn with_channel(mut self, channel_id: &str) -> Self {
        self.channel_id = channel_id.to_string();
        self
    }

    pub fn with_timezone(mut self, timezone: &str) -> Self {
        self.timezone = timezone.to_string();
        self
    }

    pub fn build(self) -> Arc<Config> {
        Arc::new(Config {
            host: self.host,
            port: self.port,
            poll_interval_seconds: 60,
            timezone: self.timezone,
            jira: JiraConfig {
                url: self.jira_url,
                email: "tester@example.com".to_string(),
                jql: "project = TCP AND statusCategory != Done".to_string(),
                max_results: 100,
            },
            slack: SlackConfig {
                channel_id: self.channel_id,
                history_lookback: self.history_lookback,
            },
        })
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Secrets with all tokens set
pub fn full_secrets() -> Arc<Secrets> {
    Arc::new(Secrets {
        slack_bot_token: "xoxb-test".to_string(),
        slack_user_token: "xoxp-test".to_string(),
        jira_api_token: "jira-test".to_string(),
    })
}

/// Secrets without the Slack user token
pub fn secrets_without_user_token() -> Arc<Secrets> {
    Arc::new(Secrets {
        slack_bot_token: "xoxb-test".to_string(),
        slack_user_token: String::new(),
        jira_api_token: "jira-test".to_string(),
    })
}
