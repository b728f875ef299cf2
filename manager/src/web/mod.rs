// File: manager/src/web/mod.rs
pub mod handlers;
pub mod server;

pub use server::{create_router, start_web_server};

use std::sync::Arc;

use crate::config::Config;
use crate::database::Database;
use crate::dispatch::HandoverDispatcher;
use crate::jira::JiraClient;

// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub database: Arc<Database>,
    pub dispatcher: Arc<HandoverDispatcher>,
    pub jira: Arc<JiraClient>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        database: Arc<Database>,
        dispatcher: Arc<HandoverDispatcher>,
        jira: Arc<JiraClient>,
    ) -> Self {
        Self {
            config,
            database,
            dispatcher,
            jira,
        }
    }
}
