//! Mapping between Todoist REST tasks and canonical tasks.
//!
//! Todoist models completion as a boolean and priority as an integer from
//! 1 (lowest) to 4 (most urgent). It does not record edit times, so the
//! canonical `updated_at` equals `created_at`.

use crate::task::adapters::parse;
use crate::task::domain::{
    ProviderId, Task, TaskOrigin, TaskPatch, TaskPriority, TaskRecord, TaskStatus,
};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::collections::HashMap;

/// Project names keyed by Todoist project identifier.
pub type ProjectNames = HashMap<String, String>;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Due {
    #[serde(default)]
    date: Option<String>,
}

fn field<'a, T: Deserialize<'a>>(raw: &'a Value, key: &str) -> Option<T> {
    raw.get(key).and_then(|value| T::deserialize(value).ok())
}

fn id_field(raw: &Value, key: &str) -> Option<String> {
    field::<RawId>(raw, key).map(RawId::into_string)
}

/// Maps the Todoist 1–4 priority scale onto canonical priorities.
///
/// Values outside the scale return `None`.
#[must_use]
pub const fn priority_from_level(level: u64) -> Option<TaskPriority> {
    match level {
        4 => Some(TaskPriority::Urgent),
        3 => Some(TaskPriority::High),
        2 => Some(TaskPriority::Medium),
        1 => Some(TaskPriority::Low),
        _ => None,
    }
}

/// Maps a canonical priority onto the Todoist 1–4 scale.
#[must_use]
pub const fn priority_level(priority: TaskPriority) -> u8 {
    match priority {
        TaskPriority::Urgent => 4,
        TaskPriority::High => 3,
        TaskPriority::Medium => 2,
        TaskPriority::Low => 1,
    }
}

/// Builds the project-name lookup from a raw project listing.
///
/// Entries without an identifier or name are skipped.
#[must_use]
pub fn project_names(raw_projects: &Value) -> ProjectNames {
    raw_projects
        .as_array()
        .map(|projects| {
            projects
                .iter()
                .filter_map(|project| {
                    let id = id_field(project, "id")?;
                    let name = field::<String>(project, "name")?;
                    Some((id, name))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Reports whether a raw Todoist task is marked complete.
///
/// A missing or malformed flag reads as open.
#[must_use]
pub fn is_completed(raw: &Value) -> bool {
    field::<bool>(raw, "is_completed").unwrap_or(false)
}

/// Converts a raw Todoist task into a canonical task.
///
/// Returns `None` for entries without an identifier or a parseable creation
/// time. Every other malformed field falls back to its default: status
/// `Todo`, priority `Low`, no due date, no labels.
#[must_use]
pub fn to_canonical(raw: &Value, projects: &ProjectNames) -> Option<Task> {
    let provider_id = ProviderId::new(id_field(raw, "id")?).ok()?;
    let created_at = field::<String>(raw, "created_at").and_then(|value| parse::timestamp(&value))?;

    let status = if is_completed(raw) {
        TaskStatus::Done
    } else {
        TaskStatus::Todo
    };
    let priority = field::<u64>(raw, "priority")
        .and_then(priority_from_level)
        .unwrap_or(TaskPriority::Low);
    let labels = field::<Vec<Value>>(raw, "labels")
        .unwrap_or_default()
        .iter()
        .filter_map(|label| label.as_str().map(str::to_owned))
        .collect();
    let project_name = id_field(raw, "project_id").and_then(|id| projects.get(&id).cloned());

    Some(Task::from_record(TaskRecord {
        origin: TaskOrigin::Todoist,
        provider_id,
        title: field::<String>(raw, "content").unwrap_or_default(),
        description: field::<String>(raw, "description"),
        status,
        priority,
        due_date: field::<Due>(raw, "due")
            .and_then(|due| due.date)
            .and_then(|date| parse::date(&date)),
        created_at,
        updated_at: None,
        labels,
        project_name,
    }))
}

/// Builds the Todoist write payload for the fields set in `patch`.
///
/// Status is not a Todoist field: completion is driven by the close and
/// reopen endpoints. Project moves are not part of the REST update call, so
/// `project_name` is not written.
#[must_use]
pub fn from_canonical(patch: &TaskPatch) -> Value {
    let mut payload = Map::new();
    if let Some(title) = &patch.title {
        payload.insert("content".to_owned(), json!(title));
    }
    if let Some(description) = &patch.description {
        payload.insert("description".to_owned(), json!(description));
    }
    if let Some(priority) = patch.priority {
        payload.insert("priority".to_owned(), json!(priority_level(priority)));
    }
    if let Some(due_date) = patch.due_date {
        payload.insert("due_date".to_owned(), json!(parse::format_date(due_date)));
    }
    if let Some(labels) = &patch.labels {
        let names: Vec<&str> = labels
            .iter()
            .map(|label| label.trim())
            .filter(|label| !label.is_empty())
            .collect();
        payload.insert("labels".to_owned(), json!(names));
    }
    Value::Object(payload)
}
