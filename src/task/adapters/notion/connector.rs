//! Notion database connector.
//!
//! Tasks are pages of one database. Reads page through the database query
//! endpoint; deletes archive the page rather than removing it.

use super::normalize;
use crate::task::adapters::{http, retry::RetryPolicy};
use crate::task::domain::{NewTask, ProviderId, Task, TaskOrigin, TaskPatch};
use crate::task::ports::{ConnectorError, ConnectorResult, TaskConnector};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::instrument;

/// Public Notion API endpoint.
pub const DEFAULT_NOTION_API_BASE: &str = "https://api.notion.com";
/// API version pinned in every request.
pub const NOTION_VERSION: &str = "2022-06-28";
const PAGE_SIZE: u32 = 100;

/// Settings for a [`NotionConnector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotionConfig {
    /// Integration token.
    pub token: String,
    /// Identifier of the database holding the tasks.
    pub database_id: String,
    /// API base URL without trailing slash.
    pub api_base: String,
    /// Retry tuning; Notion allows about three requests per second.
    pub retry: RetryPolicy,
}

impl NotionConfig {
    /// Creates settings for the public API with the default retry policy.
    #[must_use]
    pub fn new(token: impl Into<String>, database_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            database_id: database_id.into(),
            api_base: DEFAULT_NOTION_API_BASE.to_owned(),
            retry: RetryPolicy::new(4, Duration::from_millis(500)),
        }
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_owned();
        self
    }

    /// Overrides the retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[derive(Debug, Deserialize)]
struct QueryPage {
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
}

/// Connector for tasks stored as Notion database pages.
#[derive(Debug, Clone)]
pub struct NotionConnector {
    client: reqwest::Client,
    config: NotionConfig,
}

impl NotionConnector {
    /// Creates a connector.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectorError::Configuration`] when the token or database
    /// identifier is blank, or the HTTP client cannot be built.
    pub fn new(config: NotionConfig) -> ConnectorResult<Self> {
        if config.token.trim().is_empty() {
            return Err(ConnectorError::Configuration(
                "Notion token is missing".to_owned(),
            ));
        }
        if config.database_id.trim().is_empty() {
            return Err(ConnectorError::Configuration(
                "Notion database identifier is missing".to_owned(),
            ));
        }
        Ok(Self {
            client: http::build_client()?,
            config,
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{path}", self.config.api_base))
            .bearer_auth(&self.config.token)
            .header("Notion-Version", NOTION_VERSION)
    }

    async fn query_page(&self, cursor: Option<&str>) -> ConnectorResult<QueryPage> {
        let mut body = json!({ "page_size": PAGE_SIZE });
        if let (Some(start_cursor), Some(fields)) = (cursor, body.as_object_mut()) {
            fields.insert("start_cursor".to_owned(), json!(start_cursor));
        }
        let path = format!("/v1/databases/{}/query", self.config.database_id);
        let raw = self
            .config
            .retry
            .run("notion.query", || {
                http::send_json(self.request(reqwest::Method::POST, &path).json(&body))
            })
            .await?;
        QueryPage::deserialize(&raw).map_err(|err| ConnectorError::Decode(err.to_string()))
    }

    async fn patch_page(&self, provider_id: &ProviderId, body: &Value) -> ConnectorResult<Value> {
        let path = format!("/v1/pages/{provider_id}");
        self.config
            .retry
            .run("notion.update", || {
                http::send_json(self.request(reqwest::Method::PATCH, &path).json(body))
            })
            .await
    }
}

fn page_to_task(raw: &Value) -> ConnectorResult<Task> {
    normalize::to_canonical(raw).ok_or_else(|| {
        ConnectorError::Decode("Notion returned a page that is not a valid task".to_owned())
    })
}

#[async_trait]
impl TaskConnector for NotionConnector {
    fn origin(&self) -> TaskOrigin {
        TaskOrigin::Notion
    }

    #[instrument(level = "info", skip(self), fields(database = %self.config.database_id))]
    async fn fetch_all(&self) -> ConnectorResult<Vec<Task>> {
        let mut raw_pages = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = self.query_page(cursor.as_deref()).await?;
            raw_pages.extend(page.results);
            match page.next_cursor {
                Some(next) if page.has_more => cursor = Some(next),
                _ => break,
            }
        }

        let tasks: Vec<Task> = raw_pages.iter().filter_map(normalize::to_canonical).collect();
        tracing::debug!(
            fetched = raw_pages.len(),
            normalized = tasks.len(),
            "notion pages fetched"
        );
        Ok(tasks)
    }

    #[instrument(level = "info", skip(self, input))]
    async fn create(&self, input: &NewTask) -> ConnectorResult<Task> {
        let body = json!({
            "parent": { "database_id": self.config.database_id },
            "properties": normalize::from_canonical(&input.as_patch()),
        });
        let raw = self
            .config
            .retry
            .run("notion.create", || {
                http::send_json(self.request(reqwest::Method::POST, "/v1/pages").json(&body))
            })
            .await?;
        page_to_task(&raw)
    }

    #[instrument(level = "info", skip(self, patch), fields(page = %provider_id))]
    async fn update(&self, provider_id: &ProviderId, patch: &TaskPatch) -> ConnectorResult<Task> {
        let body = json!({ "properties": normalize::from_canonical(patch) });
        let raw = self.patch_page(provider_id, &body).await?;
        page_to_task(&raw)
    }

    #[instrument(level = "info", skip(self), fields(page = %provider_id))]
    async fn delete(&self, provider_id: &ProviderId) -> ConnectorResult<()> {
        self.patch_page(provider_id, &json!({ "archived": true }))
            .await
            .map(|_| ())
    }
}
