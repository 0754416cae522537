//! Todoist REST v2 connector.
//!
//! Completion is a separate action in Todoist: status changes are applied
//! with the close and reopen endpoints straight after the field update, and
//! only when the completion flag differs. Project names are best-effort
//! enrichment. Deletes are permanent.

use super::normalize::{self, ProjectNames};
use crate::task::adapters::{http, retry::RetryPolicy};
use crate::task::domain::{NewTask, ProviderId, Task, TaskOrigin, TaskPatch, TaskStatus};
use crate::task::ports::{ConnectorError, ConnectorResult, TaskConnector};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::instrument;

/// Public Todoist API endpoint.
pub const DEFAULT_TODOIST_API_BASE: &str = "https://api.todoist.com";

/// Settings for a [`TodoistConnector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoistConfig {
    /// API token.
    pub token: String,
    /// Restricts reads and creates to one project when set.
    pub project_id: Option<String>,
    /// API base URL without trailing slash.
    pub api_base: String,
    /// Retry tuning; Todoist allows 450 requests per 15 minutes.
    pub retry: RetryPolicy,
}

impl TodoistConfig {
    /// Creates settings for the public API with the default retry policy.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            project_id: None,
            api_base: DEFAULT_TODOIST_API_BASE.to_owned(),
            retry: RetryPolicy::new(3, Duration::from_secs(1)),
        }
    }

    /// Restricts the connector to one project.
    #[must_use]
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
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

/// Connector for Todoist tasks.
#[derive(Debug, Clone)]
pub struct TodoistConnector {
    client: reqwest::Client,
    config: TodoistConfig,
}

impl TodoistConnector {
    /// Creates a connector.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectorError::Configuration`] when the token is blank or
    /// the HTTP client cannot be built.
    pub fn new(config: TodoistConfig) -> ConnectorResult<Self> {
        if config.token.trim().is_empty() {
            return Err(ConnectorError::Configuration(
                "Todoist token is missing".to_owned(),
            ));
        }
        Ok(Self {
            client: http::build_client()?,
            config,
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}/rest/v2{path}", self.config.api_base))
            .bearer_auth(&self.config.token)
    }

    async fn list_tasks(&self) -> ConnectorResult<Value> {
        self.config
            .retry
            .run("todoist.tasks", || {
                let mut request = self.request(reqwest::Method::GET, "/tasks");
                if let Some(project_id) = &self.config.project_id {
                    request = request.query(&[("project_id", project_id)]);
                }
                http::send_json(request)
            })
            .await
    }

    async fn post_json(&self, operation: &str, path: &str, body: &Value) -> ConnectorResult<Value> {
        self.config
            .retry
            .run(operation, || {
                http::send_json(self.request(reqwest::Method::POST, path).json(body))
            })
            .await
    }

    async fn post_action(&self, operation: &str, path: &str) -> ConnectorResult<()> {
        self.config
            .retry
            .run(operation, || {
                let request = self.request(reqwest::Method::POST, path);
                async move { http::send(request).await.map(|_| ()) }
            })
            .await
    }

    async fn project_names(&self) -> ConnectorResult<ProjectNames> {
        let raw = self
            .config
            .retry
            .run("todoist.projects", || {
                http::send_json(self.request(reqwest::Method::GET, "/projects"))
            })
            .await?;
        Ok(normalize::project_names(&raw))
    }

    /// Resolves project names, or an empty lookup when the listing fails.
    async fn project_names_or_empty(&self) -> ProjectNames {
        self.project_names().await.unwrap_or_else(|error| {
            tracing::warn!(error = %error, "todoist project listing failed; project names omitted");
            ProjectNames::new()
        })
    }

    /// Closes or reopens a task so Todoist reflects `status`.
    async fn apply_status(&self, provider_id: &ProviderId, status: TaskStatus) -> ConnectorResult<()> {
        if status.is_done() {
            self.post_action("todoist.close", &format!("/tasks/{provider_id}/close"))
                .await
        } else {
            self.post_action("todoist.reopen", &format!("/tasks/{provider_id}/reopen"))
                .await
        }
    }

    fn decode(raw: &Value, projects: &ProjectNames) -> ConnectorResult<Task> {
        normalize::to_canonical(raw, projects).ok_or_else(|| {
            ConnectorError::Decode("Todoist returned a task that is not a valid task".to_owned())
        })
    }
}

#[async_trait]
impl TaskConnector for TodoistConnector {
    fn origin(&self) -> TaskOrigin {
        TaskOrigin::Todoist
    }

    #[instrument(level = "info", skip(self))]
    async fn fetch_all(&self) -> ConnectorResult<Vec<Task>> {
        let projects = self.project_names_or_empty().await;
        let raw = self.list_tasks().await?;
        let entries = raw.as_array().ok_or_else(|| {
            ConnectorError::Decode("Todoist task listing is not an array".to_owned())
        })?;

        let tasks: Vec<Task> = entries
            .iter()
            .filter(|entry| entry.is_object())
            .filter_map(|entry| normalize::to_canonical(entry, &projects))
            .collect();
        tracing::debug!(
            fetched = entries.len(),
            normalized = tasks.len(),
            "todoist tasks fetched"
        );
        Ok(tasks)
    }

    #[instrument(level = "info", skip(self, input))]
    async fn create(&self, input: &NewTask) -> ConnectorResult<Task> {
        let mut body = normalize::from_canonical(&input.as_patch());
        if let (Some(project_id), Some(fields)) = (&self.config.project_id, body.as_object_mut()) {
            fields.insert("project_id".to_owned(), json!(project_id));
        }
        let raw = self.post_json("todoist.create", "/tasks", &body).await?;
        let created = Self::decode(&raw, &ProjectNames::new())?;

        // Completion is applied before any enrichment call.
        if input.status.is_done() && !normalize::is_completed(&raw) {
            self.apply_status(created.provider_id(), TaskStatus::Done)
                .await?;
        }

        let task = Self::decode(&raw, &self.project_names_or_empty().await)?;
        if input.status.is_done() {
            return Ok(task.with_status(TaskStatus::Done));
        }
        Ok(task)
    }

    #[instrument(level = "info", skip(self, patch), fields(task = %provider_id))]
    async fn update(&self, provider_id: &ProviderId, patch: &TaskPatch) -> ConnectorResult<Task> {
        let body = normalize::from_canonical(patch);
        let raw = self
            .post_json("todoist.update", &format!("/tasks/{provider_id}"), &body)
            .await?;

        // Close or reopen only when completion actually changes.
        if let Some(status) = patch
            .status
            .filter(|status| status.is_done() != normalize::is_completed(&raw))
        {
            self.apply_status(provider_id, status).await?;
        }

        let task = Self::decode(&raw, &self.project_names_or_empty().await)?;
        Ok(match patch.status.map(TaskStatus::is_done) {
            Some(true) => task.with_status(TaskStatus::Done),
            Some(false) => task.with_status(TaskStatus::Todo),
            None => task,
        })
    }

    #[instrument(level = "info", skip(self), fields(task = %provider_id))]
    async fn delete(&self, provider_id: &ProviderId) -> ConnectorResult<()> {
        let path = format!("/tasks/{provider_id}");
        self.config
            .retry
            .run("todoist.delete", || {
                let request = self.request(reqwest::Method::DELETE, &path);
                async move { http::send(request).await.map(|_| ()) }
            })
            .await
    }
}
