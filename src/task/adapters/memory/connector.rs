//! In-memory connector for aggregation tests and local wiring.

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{NewTask, ProviderId, Task, TaskOrigin, TaskPatch, TaskRecord},
    ports::{ConnectorError, ConnectorResult, TaskConnector},
};

/// Number of times each connector operation has been invoked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectorCalls {
    /// `fetch_all` invocations.
    pub fetch_all: usize,
    /// `create` invocations.
    pub create: usize,
    /// `update` invocations.
    pub update: usize,
    /// `delete` invocations.
    pub delete: usize,
}

impl ConnectorCalls {
    /// Total invocations across all operations.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.fetch_all + self.create + self.update + self.delete
    }
}

/// Thread-safe in-memory connector serving one origin.
///
/// Tasks are kept in insertion order. Failures can be injected per
/// operation family to exercise partial-outage handling.
#[derive(Clone)]
pub struct InMemoryTaskConnector {
    origin: TaskOrigin,
    clock: Arc<dyn Clock + Send + Sync>,
    state: Arc<RwLock<InMemoryConnectorState>>,
}

#[derive(Debug, Default)]
struct InMemoryConnectorState {
    tasks: Vec<Task>,
    next_id: u64,
    calls: ConnectorCalls,
    fetch_failure: Option<ConnectorError>,
    write_failure: Option<ConnectorError>,
}

impl InMemoryTaskConnector {
    /// Creates an empty connector using the system clock.
    #[must_use]
    pub fn new(origin: TaskOrigin) -> Self {
        Self::with_clock(origin, Arc::new(DefaultClock))
    }

    /// Creates an empty connector using the given clock for timestamps.
    #[must_use]
    pub fn with_clock(origin: TaskOrigin, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            origin,
            clock,
            state: Arc::new(RwLock::new(InMemoryConnectorState::default())),
        }
    }

    /// Adds a task as if it already existed at the provider.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectorError::Rejected`] when the record belongs to a
    /// different origin, or a transport error when the lock is poisoned.
    pub fn seed(&self, record: TaskRecord) -> ConnectorResult<Task> {
        if record.origin != self.origin {
            return Err(ConnectorError::Rejected {
                status: 422,
                body: format!("record belongs to {}", record.origin),
            });
        }
        let task = Task::from_record(record);
        self.write_state()?.tasks.push(task.clone());
        Ok(task)
    }

    /// Makes every subsequent `fetch_all` fail with `error`; `None` clears it.
    ///
    /// # Errors
    ///
    /// Returns a transport error when the lock is poisoned.
    pub fn fail_fetches_with(&self, error: Option<ConnectorError>) -> ConnectorResult<()> {
        self.write_state()?.fetch_failure = error;
        Ok(())
    }

    /// Makes every subsequent write fail with `error`; `None` clears it.
    ///
    /// # Errors
    ///
    /// Returns a transport error when the lock is poisoned.
    pub fn fail_writes_with(&self, error: Option<ConnectorError>) -> ConnectorResult<()> {
        self.write_state()?.write_failure = error;
        Ok(())
    }

    /// Returns the invocation counters.
    ///
    /// # Errors
    ///
    /// Returns a transport error when the lock is poisoned.
    pub fn calls(&self) -> ConnectorResult<ConnectorCalls> {
        let state = self
            .state
            .read()
            .map_err(|err| ConnectorError::transport(std::io::Error::other(err.to_string())))?;
        Ok(state.calls)
    }

    fn write_state(
        &self,
    ) -> ConnectorResult<std::sync::RwLockWriteGuard<'_, InMemoryConnectorState>> {
        self.state
            .write()
            .map_err(|err| ConnectorError::transport(std::io::Error::other(err.to_string())))
    }
}

fn apply_patch(record: &mut TaskRecord, patch: &TaskPatch) {
    if let Some(title) = &patch.title {
        record.title.clone_from(title);
    }
    if let Some(description) = &patch.description {
        record.description = Some(description.clone());
    }
    if let Some(status) = patch.status {
        record.status = status;
    }
    if let Some(priority) = patch.priority {
        record.priority = priority;
    }
    if let Some(due_date) = patch.due_date {
        record.due_date = Some(due_date);
    }
    if let Some(labels) = &patch.labels {
        record.labels.clone_from(labels);
    }
    if let Some(project_name) = &patch.project_name {
        record.project_name = Some(project_name.clone());
    }
}

#[async_trait]
impl TaskConnector for InMemoryTaskConnector {
    fn origin(&self) -> TaskOrigin {
        self.origin
    }

    async fn fetch_all(&self) -> ConnectorResult<Vec<Task>> {
        let mut state = self.write_state()?;
        state.calls.fetch_all += 1;
        if let Some(error) = &state.fetch_failure {
            return Err(error.clone());
        }
        Ok(state.tasks.clone())
    }

    async fn create(&self, input: &NewTask) -> ConnectorResult<Task> {
        let mut state = self.write_state()?;
        state.calls.create += 1;
        if let Some(error) = &state.write_failure {
            return Err(error.clone());
        }

        state.next_id += 1;
        let provider_id = ProviderId::new(format!("mem{}", state.next_id))
            .map_err(|err| ConnectorError::Decode(err.to_string()))?;
        let mut record = TaskRecord {
            origin: self.origin,
            provider_id,
            title: String::new(),
            description: None,
            status: input.status,
            priority: input.priority,
            due_date: None,
            created_at: self.clock.utc(),
            updated_at: None,
            labels: Vec::new(),
            project_name: None,
        };
        apply_patch(&mut record, &input.as_patch());

        let task = Task::from_record(record);
        state.tasks.push(task.clone());
        Ok(task)
    }

    async fn update(&self, provider_id: &ProviderId, patch: &TaskPatch) -> ConnectorResult<Task> {
        let mut state = self.write_state()?;
        state.calls.update += 1;
        if let Some(error) = &state.write_failure {
            return Err(error.clone());
        }

        let slot = state
            .tasks
            .iter_mut()
            .find(|task| task.provider_id() == provider_id)
            .ok_or(ConnectorError::NotFound)?;
        let mut record = slot.clone().into_record();
        apply_patch(&mut record, patch);
        record.updated_at = Some(self.clock.utc());

        let task = Task::from_record(record);
        *slot = task.clone();
        Ok(task)
    }

    async fn delete(&self, provider_id: &ProviderId) -> ConnectorResult<()> {
        let mut state = self.write_state()?;
        state.calls.delete += 1;
        if let Some(error) = &state.write_failure {
            return Err(error.clone());
        }

        let before = state.tasks.len();
        state.tasks.retain(|task| task.provider_id() != provider_id);
        if state.tasks.len() == before {
            return Err(ConnectorError::NotFound);
        }
        Ok(())
    }
}
