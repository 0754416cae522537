//! Then steps for task aggregation BDD scenarios.

use super::world::TaskAggregationWorld;
use rstest_bdd_macros::then;
use taskhub::task::{domain::TaskOrigin, services::TaskAggregationError};

fn titles(world: &TaskAggregationWorld) -> Result<Vec<String>, eyre::Report> {
    Ok(world
        .last_tasks()?
        .iter()
        .map(|task| task.title().to_owned())
        .collect())
}

#[then(r#"the task titles are "{expected}""#)]
fn task_titles_are(world: &TaskAggregationWorld, expected: String) -> Result<(), eyre::Report> {
    let actual = titles(world)?;
    let wanted: Vec<String> = expected.split(", ").map(str::to_owned).collect();
    if actual != wanted {
        return Err(eyre::eyre!("expected titles {wanted:?}, found {actual:?}"));
    }
    Ok(())
}

#[then(r#"the task titles include "{title}""#)]
fn task_titles_include(world: &TaskAggregationWorld, title: String) -> Result<(), eyre::Report> {
    let actual = titles(world)?;
    if !actual.contains(&title) {
        return Err(eyre::eyre!("expected {title} among {actual:?}"));
    }
    Ok(())
}

#[then("{count:u64} task is returned")]
fn task_count_is(world: &TaskAggregationWorld, count: u64) -> Result<(), eyre::Report> {
    let actual = world.last_tasks()?.len();
    if u64::try_from(actual)? != count {
        return Err(eyre::eyre!("expected {count} tasks, found {actual}"));
    }
    Ok(())
}

#[then(r#"a failure is reported for "{origin}""#)]
fn failure_reported(world: &TaskAggregationWorld, origin: String) -> Result<(), eyre::Report> {
    let expected = TaskOrigin::try_from(origin.as_str())?;
    let report = world
        .last_report
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no tasks have been requested in this scenario"))?;
    if !report.failures.iter().any(|failure| failure.origin == expected) {
        return Err(eyre::eyre!(
            "expected a failure for {origin}, found {:?}",
            report.failures
        ));
    }
    Ok(())
}

#[then(r#"the "{origin}" provider was read {count:u64} times"#)]
fn provider_read_count(
    world: &TaskAggregationWorld,
    origin: String,
    count: u64,
) -> Result<(), eyre::Report> {
    let calls = world.connector(&origin)?.calls()?;
    if u64::try_from(calls.fetch_all)? != count {
        return Err(eyre::eyre!(
            "expected {count} reads of {origin}, found {}",
            calls.fetch_all
        ));
    }
    Ok(())
}

#[then(r#"the "{origin}" provider received {count:u64} writes"#)]
fn provider_write_count(
    world: &TaskAggregationWorld,
    origin: String,
    count: u64,
) -> Result<(), eyre::Report> {
    let calls = world.connector(&origin)?.calls()?;
    let writes = calls.create + calls.update + calls.delete;
    if u64::try_from(writes)? != count {
        return Err(eyre::eyre!(
            "expected {count} writes to {origin}, found {writes}"
        ));
    }
    Ok(())
}

#[then(r#"the task "{title}" has status "{status}""#)]
fn task_has_status(
    world: &TaskAggregationWorld,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    let task = world
        .last_tasks()?
        .iter()
        .find(|task| task.title() == title)
        .ok_or_else(|| eyre::eyre!("no task titled {title} in the last read"))?;
    if task.status().as_str() != status {
        return Err(eyre::eyre!(
            "expected status {status}, found {}",
            task.status()
        ));
    }
    Ok(())
}

#[then("the write fails with an unsupported origin error")]
fn write_fails_unsupported(world: &TaskAggregationWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_write
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no write has been attempted in this scenario"))?;
    if !matches!(result, Err(TaskAggregationError::UnsupportedOrigin(_))) {
        return Err(eyre::eyre!(
            "expected UnsupportedOrigin error, got {result:?}"
        ));
    }
    Ok(())
}
