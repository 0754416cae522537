//! Given steps for task aggregation BDD scenarios.

use super::world::{TaskAggregationWorld, scenario_time};
use chrono::{DateTime, Utc};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskhub::task::{
    domain::{ProviderId, TaskOrigin, TaskPriority, TaskRecord, TaskStatus},
    ports::ConnectorError,
};

fn seed(
    world: &mut TaskAggregationWorld,
    origin: TaskOrigin,
    title: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
) -> Result<(), eyre::Report> {
    world.seeded += 1;
    let record = TaskRecord {
        origin,
        provider_id: ProviderId::new(format!("seed{}", world.seeded))?,
        title,
        description: None,
        status: TaskStatus::Todo,
        priority: TaskPriority::Medium,
        due_date: None,
        created_at,
        updated_at,
        labels: Vec::new(),
        project_name: None,
    };
    world
        .connector(origin.as_str())?
        .seed(record)
        .wrap_err("seed scenario task")?;
    Ok(())
}

#[given(r#"a notion task "{title}" last edited at "{time}""#)]
fn notion_task(
    world: &mut TaskAggregationWorld,
    title: String,
    time: String,
) -> Result<(), eyre::Report> {
    let edited_at = scenario_time(&time)?;
    let created_at = scenario_time("08:00")?;
    seed(world, TaskOrigin::Notion, title, created_at, Some(edited_at))
}

#[given(r#"a todoist task "{title}" created at "{time}""#)]
fn todoist_task(
    world: &mut TaskAggregationWorld,
    title: String,
    time: String,
) -> Result<(), eyre::Report> {
    let created_at = scenario_time(&time)?;
    seed(world, TaskOrigin::Todoist, title, created_at, None)
}

#[given("the todoist provider is unavailable")]
fn todoist_unavailable(world: &mut TaskAggregationWorld) -> Result<(), eyre::Report> {
    world
        .todoist
        .fail_fetches_with(Some(ConnectorError::Server {
            status: 503,
            body: "maintenance".to_owned(),
        }))
        .wrap_err("inject todoist outage")?;
    Ok(())
}
