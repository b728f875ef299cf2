//! Mock Jira REST API server.
//!
//! Simulates the `search/jql` endpoint and issue comment posting.

use serde_json::{json, Value};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct MockJiraServer {
    pub server: MockServer,
}

impl MockJiraServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// JQL search returning the given issues
    pub async fn mock_search(&self, issues: Value) {
        Mock::given(method("POST"))
            .and(path("/rest/api/3/search/jql"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "issues": issues })),
            )
            .mount(&self.server)
            .await;
    }

    /// JQL search failing with the given HTTP status
    pub async fn mock_search_error(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/rest/api/3/search/jql"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Accept comment posts to any issue
    pub async fn mock_comment_ok(&self) {
        Mock::given(method("POST"))
            .and(path_regex(r"^/rest/api/3/issue/[^/]+/comment$"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "10000" })))
            .mount(&self.server)
            .await;
    }

    /// Reject comment posts with the given HTTP status
    pub async fn mock_comment_error(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path_regex(r"^/rest/api/3/issue/[^/]+/comment$"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Number of comment posts received for a specific issue
    pub async fn comment_post_count(&self, issue_key: &str) -> usize {
        let comment_path = format!("/rest/api/3/issue/{}/comment", issue_key);
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == comment_path)
            .count()
    }
}
