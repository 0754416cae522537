//! Shared world state for task aggregation BDD scenarios.

use std::sync::Arc;

use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use mockable::DefaultClock;
use rstest::fixture;
use taskhub::task::{
    adapters::memory::InMemoryTaskConnector,
    domain::{Task, TaskOrigin},
    ports::TaskConnector,
    services::{AggregatedTasks, TaskAggregationResult, TaskAggregationService},
};

/// Service type used by the BDD world.
pub type TestAggregationService = TaskAggregationService<DefaultClock>;

/// Scenario world for task aggregation behaviour tests.
pub struct TaskAggregationWorld {
    pub notion: InMemoryTaskConnector,
    pub todoist: InMemoryTaskConnector,
    pub service: TestAggregationService,
    pub seeded: usize,
    pub last_report: Option<AggregatedTasks>,
    pub last_write: Option<TaskAggregationResult<Task>>,
}

impl TaskAggregationWorld {
    /// Creates a world with two empty providers.
    #[must_use]
    pub fn new() -> Self {
        let notion = InMemoryTaskConnector::new(TaskOrigin::Notion);
        let todoist = InMemoryTaskConnector::new(TaskOrigin::Todoist);
        let connectors: Vec<Arc<dyn TaskConnector>> =
            vec![Arc::new(notion.clone()), Arc::new(todoist.clone())];

        Self {
            notion,
            todoist,
            service: TaskAggregationService::new(connectors, Arc::new(DefaultClock)),
            seeded: 0,
            last_report: None,
            last_write: None,
        }
    }

    /// Returns the connector serving `origin`.
    pub fn connector(&self, origin: &str) -> Result<&InMemoryTaskConnector, eyre::Report> {
        match TaskOrigin::try_from(origin)? {
            TaskOrigin::Notion => Ok(&self.notion),
            TaskOrigin::Todoist => Ok(&self.todoist),
        }
    }

    /// Returns the tasks of the most recent read.
    pub fn last_tasks(&self) -> Result<&[Task], eyre::Report> {
        self.last_report
            .as_ref()
            .map(AggregatedTasks::tasks)
            .ok_or_else(|| eyre::eyre!("no tasks have been requested in this scenario"))
    }
}

impl Default for TaskAggregationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskAggregationWorld {
    TaskAggregationWorld::default()
}

/// Parses an `HH:MM` time on the fixed scenario day.
pub fn scenario_time(clock_time: &str) -> Result<DateTime<Utc>, eyre::Report> {
    let time = NaiveTime::parse_from_str(clock_time, "%H:%M")?;
    let day = Utc
        .with_ymd_and_hms(2024, 3, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| eyre::eyre!("invalid scenario day"))?;
    Ok(day.date_naive().and_time(time).and_utc())
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
