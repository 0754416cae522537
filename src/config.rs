//! Environment-driven configuration and service wiring.
//!
//! A provider is enabled by setting its token. [`TaskHubConfig::from_env`]
//! reads:
//!
//! | Variable | Meaning |
//! |---|---|
//! | `NOTION_TOKEN` | Notion integration token |
//! | `NOTION_DATABASE_ID` | Notion database holding the tasks |
//! | `NOTION_API_BASE` | Notion API base URL override |
//! | `TODOIST_TOKEN` | Todoist API token |
//! | `TODOIST_PROJECT_ID` | restricts Todoist to one project |
//! | `TODOIST_API_BASE` | Todoist API base URL override |
//! | `TASKHUB_CACHE_TTL_SECS` | snapshot lifetime in seconds (default 30) |

use crate::task::{
    adapters::{
        notion::{NotionConfig, NotionConnector},
        todoist::{TodoistConfig, TodoistConnector},
    },
    ports::{ConnectorError, TaskConnector},
    services::{DEFAULT_SNAPSHOT_TTL, TaskAggregationService},
};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading configuration or wiring connectors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("missing configuration value {0}")]
    Missing(&'static str),

    /// A variable holds a value that cannot be parsed.
    #[error("invalid value for {key}: {value}")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// Offending value.
        value: String,
    },

    /// Neither provider is configured.
    #[error("no task provider configured; set NOTION_TOKEN or TODOIST_TOKEN")]
    NoProviders,

    /// A connector refused its settings.
    #[error(transparent)]
    Connector(#[from] ConnectorError),
}

/// Top-level configuration for the aggregation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHubConfig {
    /// Notion settings, when Notion is enabled.
    pub notion: Option<NotionConfig>,
    /// Todoist settings, when Todoist is enabled.
    pub todoist: Option<TodoistConfig>,
    /// Snapshot lifetime.
    pub cache_ttl: Duration,
}

impl Default for TaskHubConfig {
    fn default() -> Self {
        Self {
            notion: None,
            todoist: None,
            cache_ttl: DEFAULT_SNAPSHOT_TTL,
        }
    }
}

impl TaskHubConfig {
    /// Loads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// See [`TaskHubConfig::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `NOTION_TOKEN` is set without
    /// `NOTION_DATABASE_ID`, [`ConfigError::Invalid`] for an unparseable TTL,
    /// and [`ConfigError::NoProviders`] when no token is set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| lookup(key).filter(|found| !found.trim().is_empty());

        let notion = value("NOTION_TOKEN")
            .map(|token| {
                let database_id =
                    value("NOTION_DATABASE_ID").ok_or(ConfigError::Missing("NOTION_DATABASE_ID"))?;
                let mut settings = NotionConfig::new(token, database_id);
                if let Some(api_base) = value("NOTION_API_BASE") {
                    settings = settings.with_api_base(api_base);
                }
                Ok::<_, ConfigError>(settings)
            })
            .transpose()?;

        let todoist = value("TODOIST_TOKEN").map(|token| {
            let mut settings = TodoistConfig::new(token);
            if let Some(project_id) = value("TODOIST_PROJECT_ID") {
                settings = settings.with_project_id(project_id);
            }
            if let Some(api_base) = value("TODOIST_API_BASE") {
                settings = settings.with_api_base(api_base);
            }
            settings
        });

        if notion.is_none() && todoist.is_none() {
            return Err(ConfigError::NoProviders);
        }

        let cache_ttl = value("TASKHUB_CACHE_TTL_SECS")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|_| ConfigError::Invalid {
                        key: "TASKHUB_CACHE_TTL_SECS",
                        value: raw.clone(),
                    })
            })
            .transpose()?
            .unwrap_or(DEFAULT_SNAPSHOT_TTL);

        Ok(Self {
            notion,
            todoist,
            cache_ttl,
        })
    }

    /// Builds the connectors for every enabled provider, Notion first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoProviders`] when nothing is enabled, or
    /// [`ConfigError::Connector`] when a connector rejects its settings.
    pub fn connectors(&self) -> Result<Vec<Arc<dyn TaskConnector>>, ConfigError> {
        let mut connectors: Vec<Arc<dyn TaskConnector>> = Vec::new();
        if let Some(settings) = &self.notion {
            connectors.push(Arc::new(NotionConnector::new(settings.clone())?));
        }
        if let Some(settings) = &self.todoist {
            connectors.push(Arc::new(TodoistConnector::new(settings.clone())?));
        }
        if connectors.is_empty() {
            return Err(ConfigError::NoProviders);
        }
        Ok(connectors)
    }

    /// Wires an aggregation service for the enabled providers.
    ///
    /// # Errors
    ///
    /// See [`TaskHubConfig::connectors`].
    pub fn build_service<C>(&self, clock: Arc<C>) -> Result<TaskAggregationService<C>, ConfigError>
    where
        C: Clock + Send + Sync,
    {
        Ok(TaskAggregationService::new(self.connectors()?, clock).with_ttl(self.cache_ttl))
    }
}
