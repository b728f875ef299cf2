//! Slack Web API client.
//!
//! Thin wrapper over `chat.postMessage`, `conversations.history`, and
//! `conversations.replies`. Transport errors and timeouts are absorbed into
//! `SlackResponse { ok: false, error }` so callers branch on `ok` instead of
//! unwinding - a poll cycle must survive any Slack failure.

pub mod reply_gate;

pub use reply_gate::{find_anchor, AnchorScan};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::config::Secrets;
use crate::constants::http;

const SLACK_API_BASE: &str = "https://slack.com/api";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackMessage {
    pub ts: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub thread_ts: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackResponse {
    pub ok: bool,
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub messages: Option<Vec<SlackMessage>>,
}

impl SlackResponse {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            ts: None,
            error: Some(error.into()),
            messages: None,
        }
    }
}

pub struct SlackClient {
    client: Client,
    base_url: String,
    bot_token: String,
    user_token: String,
}

impl SlackClient {
    pub fn new(secrets: &Secrets) -> Self {
        Self::with_base_url(secrets, SLACK_API_BASE)
    }

    /// Construct with an explicit API base URL (used by tests)
    pub fn with_base_url(secrets: &Secrets, base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(http::SLACK_TIMEOUT)
            .connect_timeout(http::CONNECT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client for SlackClient");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bot_token: secrets.slack_bot_token.clone(),
            user_token: secrets.slack_user_token.clone(),
        }
    }

    pub fn user_token(&self) -> &str {
        &self.user_token
    }

    async fn call_api(&self, method: &str, body: Value, token: &str) -> SlackResponse {
        let url = format!("{}/{}", self.base_url, method);
        debug!("Calling Slack API: {}", method);

        let result = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await;

        match result {
            Ok(response) => match response.json::<SlackResponse>().await {
                Ok(parsed) => parsed,
                Err(e) => SlackResponse::failure(format!("invalid response from {}: {}", method, e)),
            },
            Err(e) if e.is_timeout() => SlackResponse::failure("request timeout"),
            Err(e) => SlackResponse::failure(e.to_string()),
        }
    }

    /// Post a channel message. Uses the bot token unless an override is given.
    pub async fn post_message(
        &self,
        text: &str,
        channel: &str,
        token: Option<&str>,
    ) -> SlackResponse {
        let body = json!({ "channel": channel, "text": text });
        self.call_api("chat.postMessage", body, token.unwrap_or(&self.bot_token))
            .await
    }

    /// Post a threaded reply under `thread_ts`
    pub async fn post_thread_reply(
        &self,
        text: &str,
        thread_ts: &str,
        channel: &str,
        token: Option<&str>,
    ) -> SlackResponse {
        let body = json!({
            "channel": channel,
            "text": text,
            "thread_ts": thread_ts,
            "unfurl_links": false,
            "unfurl_media": false,
        });
        self.call_api("chat.postMessage", body, token.unwrap_or(&self.bot_token))
            .await
    }

    /// Fetch the most recent `limit` messages from a channel, newest first
    pub async fn get_history(&self, channel: &str, limit: u32) -> SlackResponse {
        let body = json!({ "channel": channel, "limit": limit });
        self.call_api("conversations.history", body, &self.user_token)
            .await
    }

    /// Fetch a thread: the root message plus any replies
    pub async fn get_thread_replies(&self, thread_ts: &str, channel: &str) -> SlackResponse {
        let body = json!({ "channel": channel, "ts": thread_ts });
        self.call_api("conversations.replies", body, &self.user_token)
            .await
    }
}
