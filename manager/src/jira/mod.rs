//! Jira REST API client.
//!
//! Thin collaborator wrapper: fetches the open tickets that feed handover
//! reports and posts scheduled comments to tickets. Authentication is basic
//! auth with the configured account email and API token.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::config::{JiraConfig, Secrets};
use crate::constants::http;
use crate::errors::JiraError;

// Custom field ids carrying the WL ticket classification
const FIELD_WL_MAIN_TYPE: &str = "customfield_10451";
const FIELD_WL_SUB_TYPE: &str = "customfield_10453";

/// An open ticket as reported by Jira, before merging operator notes
#[derive(Debug, Clone)]
pub struct JiraTicket {
    pub key: String,
    pub summary: String,
    pub wl_main_type: String,
    pub wl_sub_type: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    issues: Vec<SearchIssue>,
}

#[derive(Debug, Deserialize)]
struct SearchIssue {
    key: String,
    fields: IssueFields,
}

#[derive(Debug, Deserialize)]
struct IssueFields {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default, rename = "customfield_10451")]
    wl_main_type: Option<CustomFieldValue>,
    #[serde(default, rename = "customfield_10453")]
    wl_sub_type: Option<CustomFieldValue>,
}

#[derive(Debug, Deserialize)]
struct CustomFieldValue {
    #[serde(default)]
    value: Option<String>,
}

pub struct JiraClient {
    client: Client,
    base_url: String,
    email: String,
    api_token: String,
    jql: String,
    max_results: u32,
}

impl JiraClient {
    pub fn new(config: &JiraConfig, secrets: &Secrets) -> Self {
        let client = Client::builder()
            .timeout(http::JIRA_TIMEOUT)
            .connect_timeout(http::CONNECT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client for JiraClient");

        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            email: config.email.clone(),
            api_token: secrets.jira_api_token.clone(),
            jql: config.jql.clone(),
            max_results: config.max_results,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the open tickets matched by the configured JQL
    pub async fn fetch_open_tickets(&self) -> Result<Vec<JiraTicket>, JiraError> {
        let endpoint = format!("{}/rest/api/3/search/jql", self.base_url);
        debug!("Fetching tickets from Jira ({} max)", self.max_results);

        let body = json!({
            "jql": self.jql.trim(),
            "maxResults": self.max_results,
            "fields": [
                "key",
                "summary",
                "status",
                "assignee",
                "created",
                "duedate",
                "issuetype",
                FIELD_WL_MAIN_TYPE,
                FIELD_WL_SUB_TYPE,
            ],
        });

        let response = self
            .client
            .post(&endpoint)
            .basic_auth(&self.email, Some(&self.api_token))
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| JiraError::RequestFailed {
                endpoint: "search/jql".to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(JiraError::ApiError {
                endpoint: "search/jql".to_string(),
                status: response.status().as_u16(),
            });
        }

        let parsed: SearchResponse =
            response.json().await.map_err(|e| JiraError::RequestFailed {
                endpoint: "search/jql".to_string(),
                reason: format!("invalid response body: {}", e),
            })?;

        let tickets = parsed
            .issues
            .into_iter()
            .map(|issue| JiraTicket {
                key: issue.key,
                summary: issue.fields.summary.unwrap_or_default(),
                wl_main_type: issue
                    .fields
                    .wl_main_type
                    .and_then(|f| f.value)
                    .unwrap_or_else(|| "None".to_string()),
                wl_sub_type: issue
                    .fields
                    .wl_sub_type
                    .and_then(|f| f.value)
                    .unwrap_or_else(|| "None".to_string()),
            })
            .collect();

        Ok(tickets)
    }

    /// Post a plain-text comment to a ticket (wrapped in an ADF document)
    pub async fn post_comment(&self, issue_key: &str, comment: &str) -> Result<(), JiraError> {
        let endpoint = format!("{}/rest/api/3/issue/{}/comment", self.base_url, issue_key);

        let body = json!({
            "body": {
                "type": "doc",
                "version": 1,
                "content": [
                    {
                        "type": "paragraph",
                        "content": [{ "type": "text", "text": comment }],
                    }
                ],
            }
        });

        let response = self
            .client
            .post(&endpoint)
            .basic_auth(&self.email, Some(&self.api_token))
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| JiraError::RequestFailed {
                endpoint: format!("issue/{}/comment", issue_key),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(JiraError::ApiError {
                endpoint: format!("issue/{}/comment", issue_key),
                status: response.status().as_u16(),
            });
        }

        info!("Posted comment to Jira ticket {}", issue_key);
        Ok(())
    }
}
