//! Aggregation service: concurrent multi-provider reads, origin-routed writes.

use super::cache::{DEFAULT_SNAPSHOT_TTL, SnapshotCache, TaskSnapshot};
use crate::task::{
    domain::{NewTask, Task, TaskOrigin, TaskPatch},
    ports::{ConnectorError, TaskConnector},
};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::instrument;

/// Service-level errors for task aggregation and routing.
#[derive(Debug, Error)]
pub enum TaskAggregationError {
    /// The write targets a provider that is unknown or not configured.
    #[error("unsupported origin: {0}")]
    UnsupportedOrigin(String),

    /// The owning provider rejected the operation.
    #[error("{origin} connector failed: {source}")]
    Connector {
        /// Provider that failed.
        origin: TaskOrigin,
        /// Underlying connector error.
        #[source]
        source: ConnectorError,
    },
}

/// Result type for aggregation service operations.
pub type TaskAggregationResult<T> = Result<T, TaskAggregationError>;

/// Non-fatal diagnostic for a provider that could not be read.
#[derive(Debug, Clone)]
pub struct SourceFailure {
    /// Provider that failed.
    pub origin: TaskOrigin,
    /// Error observed after retries.
    pub error: ConnectorError,
}

/// Outcome of an aggregated read.
#[derive(Debug, Clone)]
pub struct AggregatedTasks {
    /// Merged snapshot, newest edits first.
    pub snapshot: Arc<TaskSnapshot>,
    /// Providers that failed during this read; empty on a cache hit.
    pub failures: Vec<SourceFailure>,
    /// Whether the snapshot was served from cache.
    pub from_cache: bool,
}

impl AggregatedTasks {
    /// Returns the merged tasks.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        self.snapshot.tasks()
    }
}

/// Aggregates tasks from every registered connector.
///
/// Reads are cached in a single snapshot slot owned by this instance.
/// Every successful write discards the snapshot.
pub struct TaskAggregationService<C>
where
    C: Clock + Send + Sync,
{
    connectors: Vec<Arc<dyn TaskConnector>>,
    cache: Arc<SnapshotCache>,
    ttl: Duration,
    clock: Arc<C>,
}

impl<C> TaskAggregationService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a service with its own empty cache and the default TTL.
    ///
    /// Connectors are queried and merged in the order given; when two
    /// connectors serve the same origin, writes go to the first.
    #[must_use]
    pub fn new(connectors: Vec<Arc<dyn TaskConnector>>, clock: Arc<C>) -> Self {
        Self {
            connectors,
            cache: Arc::new(SnapshotCache::new()),
            ttl: DEFAULT_SNAPSHOT_TTL,
            clock,
        }
    }

    /// Sets the snapshot time-to-live.
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Uses an externally owned cache slot.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<SnapshotCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Returns the snapshot time-to-live.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns every task from every provider, newest edits first.
    ///
    /// Never fails: unavailable providers contribute no tasks and are
    /// logged.
    pub async fn get_all_tasks(&self) -> Vec<Task> {
        self.get_all_tasks_report().await.tasks().to_vec()
    }

    /// Returns the merged tasks together with per-provider diagnostics.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_all_tasks_report(&self) -> AggregatedTasks {
        if let Some(snapshot) = self.cache.fresh(self.clock.utc(), self.ttl) {
            tracing::debug!(count = snapshot.tasks().len(), "serving cached task snapshot");
            return AggregatedTasks {
                snapshot,
                failures: Vec::new(),
                from_cache: true,
            };
        }

        let fetches = self.connectors.iter().map(|connector| async move {
            (connector.origin(), connector.fetch_all().await)
        });
        let outcomes = futures::future::join_all(fetches).await;

        let mut merged: Vec<Task> = Vec::new();
        let mut failures: Vec<SourceFailure> = Vec::new();
        for (origin, outcome) in outcomes {
            match outcome {
                Ok(tasks) => {
                    tracing::debug!(%origin, count = tasks.len(), "provider returned tasks");
                    merged.extend(tasks);
                }
                Err(error) => {
                    tracing::warn!(%origin, error = %error, "provider fetch failed");
                    failures.push(SourceFailure { origin, error });
                }
            }
        }

        merged.sort_by(|left, right| right.updated_at().cmp(&left.updated_at()));
        let snapshot = self
            .cache
            .store(TaskSnapshot::new(merged, self.clock.utc()));
        AggregatedTasks {
            snapshot,
            failures,
            from_cache: false,
        }
    }

    /// Creates a task in the provider named by `origin`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskAggregationError::UnsupportedOrigin`] before any network
    /// call when `origin` is unknown or has no connector, or
    /// [`TaskAggregationError::Connector`] when the provider rejects the
    /// write.
    #[instrument(level = "info", skip(self, input))]
    pub async fn create_task(&self, origin: &str, input: &NewTask) -> TaskAggregationResult<Task> {
        let target = TaskOrigin::try_from(origin)
            .map_err(|_| TaskAggregationError::UnsupportedOrigin(origin.to_owned()))?;
        let connector = self.connector_for(target)?;
        let task = connector
            .create(input)
            .await
            .map_err(|source| TaskAggregationError::Connector {
                origin: target,
                source,
            })?;
        self.invalidate();
        tracing::info!(task = %task.id(), "task created");
        Ok(task)
    }

    /// Applies `patch` to `task` in its owning provider.
    ///
    /// # Errors
    ///
    /// Returns [`TaskAggregationError::UnsupportedOrigin`] when the task's
    /// origin has no connector, or [`TaskAggregationError::Connector`] when
    /// the provider rejects the write.
    #[instrument(level = "info", skip(self, task, patch), fields(task = %task.id()))]
    pub async fn update_task(&self, task: &Task, patch: &TaskPatch) -> TaskAggregationResult<Task> {
        let origin = task.origin();
        let connector = self.connector_for(origin)?;
        let updated = connector
            .update(task.provider_id(), patch)
            .await
            .map_err(|source| TaskAggregationError::Connector { origin, source })?;
        self.invalidate();
        tracing::info!("task updated");
        Ok(updated)
    }

    /// Deletes `task` from its owning provider.
    ///
    /// # Errors
    ///
    /// Returns [`TaskAggregationError::UnsupportedOrigin`] when the task's
    /// origin has no connector, or [`TaskAggregationError::Connector`] when
    /// the provider rejects the delete.
    #[instrument(level = "info", skip(self, task), fields(task = %task.id()))]
    pub async fn delete_task(&self, task: &Task) -> TaskAggregationResult<()> {
        let origin = task.origin();
        let connector = self.connector_for(origin)?;
        connector
            .delete(task.provider_id())
            .await
            .map_err(|source| TaskAggregationError::Connector { origin, source })?;
        self.invalidate();
        tracing::info!("task deleted");
        Ok(())
    }

    /// Discards the cached snapshot. Idempotent.
    pub fn invalidate(&self) {
        self.cache.invalidate();
    }

    fn connector_for(&self, origin: TaskOrigin) -> TaskAggregationResult<&Arc<dyn TaskConnector>> {
        self.connectors
            .iter()
            .find(|connector| connector.origin() == origin)
            .ok_or_else(|| TaskAggregationError::UnsupportedOrigin(origin.as_str().to_owned()))
    }
}
