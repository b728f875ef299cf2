//! Mock Slack Web API server.
//!
//! Simulates `conversations.history`, `conversations.replies`, and
//! `chat.postMessage` so dispatch cycles run against a real HTTP surface.

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct MockSlackServer {
    pub server: MockServer,
}

impl MockSlackServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Channel history returning the given messages, newest first
    pub async fn mock_history(&self, messages: Value) {
        Mock::given(method("POST"))
            .and(path("/conversations.history"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({
                    "ok": true,
                    "messages": messages
                })),
            )
            .mount(&self.server)
            .await;
    }

    /// Channel history call failing at the API level
    pub async fn mock_history_error(&self, error: &str) {
        Mock::given(method("POST"))
            .and(path("/conversations.history"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({
                    "ok": false,
                    "error": error
                })),
            )
            .mount(&self.server)
            .await;
    }

    /// Thread replies for an anchor: the root message plus `reply_count`
    /// replies, mirroring the shape `conversations.replies` returns
    pub async fn mock_thread_replies(&self, anchor_ts: &str, reply_count: usize) {
        let mut messages = vec![json!({
            "ts": anchor_ts,
            "text": "root",
            "thread_ts": anchor_ts
        })];
        for i in 0..reply_count {
            messages.push(json!({
                "ts": format!("{}.reply{}", anchor_ts, i),
                "text": "a reply",
                "thread_ts": anchor_ts
            }));
        }

        Mock::given(method("POST"))
            .and(path("/conversations.replies"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({
                    "ok": true,
                    "messages": messages
                })),
            )
            .mount(&self.server)
            .await;
    }

    /// Successful chat.postMessage returning `ts`
    pub async fn mock_post_message_ok(&self, ts: &str) {
        Mock::given(method("POST"))
            .and(path("/chat.postMessage"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({
                    "ok": true,
                    "ts": ts
                })),
            )
            .mount(&self.server)
            .await;
    }

    /// chat.postMessage rejected by the API
    pub async fn mock_post_message_error(&self, error: &str) {
        Mock::given(method("POST"))
            .and(path("/chat.postMessage"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({
                    "ok": false,
                    "error": error
                })),
            )
            .mount(&self.server)
            .await;
    }

    /// Bodies of every chat.postMessage request received so far
    pub async fn posted_message_bodies(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == "/chat.postMessage")
            .filter_map(|r| serde_json::from_slice(&r.body).ok())
            .collect()
    }
}
