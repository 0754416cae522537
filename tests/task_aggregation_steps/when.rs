//! When steps for task aggregation BDD scenarios.

use super::world::{TaskAggregationWorld, run_async};
use rstest_bdd_macros::when;
use taskhub::task::domain::{NewTask, TaskPatch, TaskStatus};

#[when("all tasks are requested")]
fn all_tasks_requested(world: &mut TaskAggregationWorld) {
    let report = run_async(world.service.get_all_tasks_report());
    world.last_report = Some(report);
}

#[when(r#"a task "{title}" is created in "{origin}""#)]
fn task_created(world: &mut TaskAggregationWorld, title: String, origin: String) {
    let result = run_async(world.service.create_task(&origin, &NewTask::new(title)));
    world.last_write = Some(result);
}

#[when(r#"the task "{title}" is marked done"#)]
fn task_marked_done(world: &mut TaskAggregationWorld, title: String) -> Result<(), eyre::Report> {
    let task = world
        .last_tasks()?
        .iter()
        .find(|task| task.title() == title)
        .cloned()
        .ok_or_else(|| eyre::eyre!("no task titled {title} in the last read"))?;

    let result = run_async(
        world
            .service
            .update_task(&task, &TaskPatch::new().with_status(TaskStatus::Done)),
    );
    world.last_write = Some(result);
    Ok(())
}
