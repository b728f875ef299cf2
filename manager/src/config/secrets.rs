// File: manager/src/config/secrets.rs
//! Secrets loader for API tokens and other sensitive configuration.
//!
//! Secrets are stored in a separate TOML file (config/secrets.toml) that should
//! be excluded from version control. The main config never carries tokens.
//!
//! Example secrets.toml:
//! ```toml
//! slack_bot_token = "xoxb-..."
//! slack_user_token = "xoxp-..."
//! jira_api_token = "ATATT..."
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Secrets {
    #[serde(default)]
    pub slack_bot_token: String,
    #[serde(default)]
    pub slack_user_token: String,
    #[serde(default)]
    pub jira_api_token: String,
}

impl Secrets {
    /// Load secrets from the specified file path.
    /// Returns empty secrets if the file doesn't exist.
    pub fn load(secrets_path: &Path) -> Result<Self> {
        if !secrets_path.exists() {
            warn!(
                "Secrets file not found at {:?}, Slack/Jira tokens will need to be configured",
                secrets_path
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(secrets_path)
            .with_context(|| format!("Failed to read secrets file: {:?}", secrets_path))?;

        let secrets: Secrets = toml::from_str(&content)
            .with_context(|| format!("Failed to parse secrets file: {:?}", secrets_path))?;

        info!(
            "Loaded secrets from {:?} (slack bot: {}, slack user: {}, jira: {})",
            secrets_path,
            if secrets.slack_bot_token.is_empty() { "missing" } else { "set" },
            if secrets.slack_user_token.is_empty() { "missing" } else { "set" },
            if secrets.jira_api_token.is_empty() { "missing" } else { "set" },
        );

        Ok(secrets)
    }

    pub fn has_slack_user_token(&self) -> bool {
        !self.slack_user_token.is_empty()
    }

    pub fn has_jira_token(&self) -> bool {
        !self.jira_api_token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_secrets() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
slack_bot_token = "xoxb-test"
slack_user_token = "xoxp-test"
jira_api_token = "jira-test"
"#
        )
        .unwrap();

        let secrets = Secrets::load(file.path()).unwrap();

        assert_eq!(secrets.slack_bot_token, "xoxb-test");
        assert!(secrets.has_slack_user_token());
        assert!(secrets.has_jira_token());
    }

    #[test]
    fn test_missing_file_returns_empty() {
        let secrets = Secrets::load(Path::new("/nonexistent/secrets.toml")).unwrap();
        assert!(!secrets.has_slack_user_token());
        assert!(!secrets.has_jira_token());
    }
}
