// File: manager/src/main.rs
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use manager::config::ConfigManager;
use manager::database::Database;
use manager::dispatch::HandoverDispatcher;
use manager::jira::JiraClient;
use manager::scheduler::CommentPoller;
use manager::slack::SlackClient;
use manager::web::start_web_server;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging with reduced verbosity
    let env_filter = EnvFilter::from_default_env()
        .add_directive("manager=info".parse()?)
        .add_directive("tower_http=warn".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?)
        .add_directive("sqlx=warn".parse()?);

    fmt().with_env_filter(env_filter).init();

    info!("Starting Ticket Handover Manager");

    // Load configuration
    let config_manager = ConfigManager::new("config".to_string()).await?;
    let config = config_manager.get_current_config();
    let secrets = config_manager.get_secrets();
    info!(
        "Configuration loaded: channel {}, timezone {}, poll interval {}s",
        config.slack.channel_id, config.timezone, config.poll_interval_seconds
    );

    if !secrets.has_slack_user_token() {
        warn!("No Slack user token configured - handover replies will be skipped");
    }
    if !secrets.has_jira_token() {
        warn!("No Jira API token configured - ticket fetching will fail");
    }

    // Initialize database
    let database = Arc::new(Database::new("data/handover.db").await?);
    info!("Database initialized");

    // Initialize external service clients
    let slack = Arc::new(SlackClient::new(&secrets));
    let jira = Arc::new(JiraClient::new(&config.jira, &secrets));
    info!("Slack and Jira clients initialized");

    // Initialize handover dispatcher
    let dispatcher = Arc::new(HandoverDispatcher::new(
        config.clone(),
        secrets.clone(),
        database.clone(),
        slack.clone(),
        jira.clone(),
    ));
    info!("Handover dispatcher initialized");

    // Start the scheduler poll loop
    let poller = Arc::new(CommentPoller::new(
        config.clone(),
        database.clone(),
        jira.clone(),
        slack.clone(),
        dispatcher.clone(),
    ));
    poller.spawn();
    info!(
        "Scheduler started with {}s poll interval",
        config.poll_interval_seconds
    );

    // Start web server
    start_web_server(config, database, dispatcher, jira).await?;

    Ok(())
}
