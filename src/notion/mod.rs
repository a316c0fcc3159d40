//! Notion source-store client for Daybrief
//!
//! This module contains the thin database-query client plus the three
//! fetchers built on top of it: user configurations, tasks, and events.
//! The pipeline depends only on a handful of named fields per record; all
//! field access goes through the `props` lookup helpers.

pub mod events;
pub mod props;
pub mod tasks;
pub mod users;

pub use events::{fetch_events, EventBuckets};
pub use tasks::{fetch_tasks, Task, TaskBuckets};
pub use users::load_user_configs;

use crate::error::{DaybriefError, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Default Notion API base
const DEFAULT_API_BASE: &str = "https://api.notion.com/v1";

/// Notion API version header value
const NOTION_VERSION: &str = "2022-06-28";

/// Minimal Notion database-query client
///
/// One instance per credential: the configuration store uses the service
/// token, while task/event fetches construct a client from the per-user
/// token carried in the user's config row.
pub struct NotionClient {
    client: Client,
    token: String,
    api_base: String,
}

/// Response envelope from a database query
#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<Value>,
}

impl NotionClient {
    /// Create a new client for the given integration token
    ///
    /// # Arguments
    ///
    /// * `token` - Notion integration token
    /// * `timeout_seconds` - Request timeout applied to every call
    /// * `api_base` - Optional base URL override (tests, local mocks)
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(token: &str, timeout_seconds: u64, api_base: Option<&str>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent("daybrief/0.2.0")
            .build()?;
        Ok(Self {
            client,
            token: token.to_string(),
            api_base: api_base.unwrap_or(DEFAULT_API_BASE).trim_end_matches('/').to_string(),
        })
    }

    /// Query a database and return its raw page records
    ///
    /// # Arguments
    ///
    /// * `database_id` - Database to query
    /// * `filter` - Optional Notion filter object
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-success status, or an
    /// undecodable response body
    pub async fn query_database(
        &self,
        database_id: &str,
        filter: Option<Value>,
    ) -> Result<Vec<Value>> {
        let url = format!("{}/databases/{}/query", self.api_base, database_id);
        let mut body = serde_json::Map::new();
        if let Some(filter) = filter {
            body.insert("filter".to_string(), filter);
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&Value::Object(body))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DaybriefError::Notion(format!(
                "database {} query returned {}: {}",
                database_id, status, detail
            ))
            .into());
        }

        let parsed: QueryResponse = response.json().await?;
        Ok(parsed.results)
    }
}

/// Build the "property has a date" filter used by the task/event fetchers
pub fn date_not_empty_filter(property: &str) -> Value {
    serde_json::json!({
        "and": [
            {
                "property": property,
                "date": { "is_not_empty": true }
            }
        ]
    })
}
