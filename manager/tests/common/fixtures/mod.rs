//! This module provides reusable test utilities:
//! - Mock Slack and Jira HTTP servers
//! - Test configuration builders
//! - In-memory test databases
//! - Common test data

// Allow unused code in test fixtures - not every suite uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod mock_jira;
pub mod mock_slack;
pub mod test_config;
pub mod test_data;
pub mod test_database;

// Re-export commonly used items
pub use mock_jira::MockJiraServer;
pub use mock_slack::MockSlackServer;
pub use test_config::{full_secrets, secrets_without_user_token, TestConfigBuilder};
pub use test_data::*;
pub use test_database::TestDatabase;
