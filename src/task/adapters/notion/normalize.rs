//! Mapping between Notion database pages and canonical tasks.
//!
//! Each page property is decoded on its own through [`NotionProperty`]; a
//! property that is missing or has an unexpected shape resolves to the
//! field's default instead of failing the whole page.

use crate::task::adapters::parse;
use crate::task::domain::{
    ProviderId, Task, TaskOrigin, TaskPatch, TaskPriority, TaskRecord, TaskStatus,
};
use serde::Deserialize;
use serde_json::{Map, Value, json};

/// Title property.
pub const NAME_PROPERTY: &str = "Name";
/// Status property (`status` or `select`).
pub const STATUS_PROPERTY: &str = "Status";
/// Priority property (`select` or `status`).
pub const PRIORITY_PROPERTY: &str = "Priority";
/// Due date property.
pub const DUE_PROPERTY: &str = "Due";
/// Label property (`multi_select`).
pub const TAGS_PROPERTY: &str = "Tags";
/// Description property (`rich_text`).
pub const DESCRIPTION_PROPERTY: &str = "Description";
/// Project property (`select` or `rich_text`).
pub const PROJECT_PROPERTY: &str = "Project";

#[derive(Debug, Deserialize)]
struct NotionPage {
    #[serde(default)]
    object: Option<Value>,
    id: String,
    created_time: String,
    #[serde(default)]
    last_edited_time: Option<Value>,
    #[serde(default)]
    archived: Option<Value>,
    #[serde(default)]
    in_trash: Option<Value>,
    #[serde(default)]
    properties: Option<Value>,
}

impl NotionPage {
    fn is_removed(&self) -> bool {
        [&self.archived, &self.in_trash]
            .into_iter()
            .any(|flag| flag.as_ref().and_then(Value::as_bool).unwrap_or(false))
    }

    fn is_page(&self) -> bool {
        self.object
            .as_ref()
            .and_then(Value::as_str)
            .is_none_or(|object| object == "page")
    }

    /// Decodes one property; a `properties` value that is not an object has
    /// no properties at all.
    fn property(&self, name: &str) -> Option<NotionProperty> {
        self.properties
            .as_ref()
            .and_then(Value::as_object)
            .and_then(|properties| properties.get(name))
            .and_then(|value| NotionProperty::deserialize(value).ok())
    }
}

#[derive(Debug, Deserialize)]
struct RichText {
    #[serde(default)]
    plain_text: String,
}

#[derive(Debug, Deserialize)]
struct SelectOption {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct DateRange {
    #[serde(default)]
    start: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum NotionProperty {
    Title {
        #[serde(default)]
        title: Vec<RichText>,
    },
    RichText {
        #[serde(default)]
        rich_text: Vec<RichText>,
    },
    Status {
        status: Option<SelectOption>,
    },
    Select {
        select: Option<SelectOption>,
    },
    MultiSelect {
        #[serde(default)]
        multi_select: Vec<SelectOption>,
    },
    Date {
        date: Option<DateRange>,
    },
    #[serde(other)]
    Unsupported,
}

impl NotionProperty {
    /// Concatenates the text fragments of a title or rich-text property.
    fn text(&self) -> Option<String> {
        match self {
            Self::Title { title: fragments } | Self::RichText { rich_text: fragments } => Some(
                fragments
                    .iter()
                    .map(|fragment| fragment.plain_text.as_str())
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Returns the selected option name of a status or select property.
    fn option_name(&self) -> Option<&str> {
        match self {
            Self::Status { status: option } | Self::Select { select: option } => {
                option.as_ref().map(|selected| selected.name.as_str())
            }
            _ => None,
        }
    }

    fn option_names(&self) -> Vec<String> {
        match self {
            Self::MultiSelect { multi_select } => multi_select
                .iter()
                .map(|option| option.name.clone())
                .collect(),
            _ => Vec::new(),
        }
    }

    fn date_start(&self) -> Option<&str> {
        match self {
            Self::Date { date } => date.as_ref().and_then(|range| range.start.as_deref()),
            _ => None,
        }
    }
}

/// Converts a raw Notion page into a canonical task.
///
/// Returns `None` for entries that are not live pages, or that lack an
/// identifier or a parseable creation time. Every other malformed field
/// falls back to its default.
#[must_use]
pub fn to_canonical(raw: &Value) -> Option<Task> {
    let page = NotionPage::deserialize(raw).ok()?;
    if !page.is_page() || page.is_removed() {
        return None;
    }

    let provider_id = ProviderId::new(page.id.as_str()).ok()?;
    let created_at = parse::timestamp(&page.created_time)?;
    let updated_at = page
        .last_edited_time
        .as_ref()
        .and_then(Value::as_str)
        .and_then(parse::timestamp);

    let status = page
        .property(STATUS_PROPERTY)
        .and_then(|property| property.option_name().and_then(TaskStatus::from_label))
        .unwrap_or(TaskStatus::Todo);
    let priority = page
        .property(PRIORITY_PROPERTY)
        .and_then(|property| property.option_name().and_then(TaskPriority::from_label))
        .unwrap_or(TaskPriority::Medium);
    let project_name = page.property(PROJECT_PROPERTY).and_then(|property| {
        property
            .option_name()
            .map(str::to_owned)
            .or_else(|| property.text())
    });

    Some(Task::from_record(TaskRecord {
        origin: TaskOrigin::Notion,
        provider_id,
        title: page
            .property(NAME_PROPERTY)
            .and_then(|property| property.text())
            .unwrap_or_default(),
        description: page
            .property(DESCRIPTION_PROPERTY)
            .and_then(|property| property.text()),
        status,
        priority,
        due_date: page
            .property(DUE_PROPERTY)
            .and_then(|property| property.date_start().and_then(parse::date)),
        created_at,
        updated_at,
        labels: page
            .property(TAGS_PROPERTY)
            .map(|property| property.option_names())
            .unwrap_or_default(),
        project_name,
    }))
}

/// Returns the Notion status option name written for a canonical status.
#[must_use]
pub const fn status_name(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "Not started",
        TaskStatus::InProgress => "In progress",
        TaskStatus::Done => "Done",
    }
}

/// Returns the Notion priority option name written for a canonical priority.
#[must_use]
pub const fn priority_name(priority: TaskPriority) -> &'static str {
    match priority {
        TaskPriority::Urgent => "Urgent",
        TaskPriority::High => "High",
        TaskPriority::Medium => "Medium",
        TaskPriority::Low => "Low",
    }
}

/// Builds the Notion `properties` object for the fields set in `patch`.
///
/// Unset fields are omitted so Notion leaves them untouched.
#[must_use]
pub fn from_canonical(patch: &TaskPatch) -> Value {
    let mut properties = Map::new();
    if let Some(title) = &patch.title {
        properties.insert(NAME_PROPERTY.to_owned(), json!({ "title": rich_text(title) }));
    }
    if let Some(description) = &patch.description {
        properties.insert(
            DESCRIPTION_PROPERTY.to_owned(),
            json!({ "rich_text": rich_text(description) }),
        );
    }
    if let Some(status) = patch.status {
        properties.insert(
            STATUS_PROPERTY.to_owned(),
            json!({ "status": { "name": status_name(status) } }),
        );
    }
    if let Some(priority) = patch.priority {
        properties.insert(
            PRIORITY_PROPERTY.to_owned(),
            json!({ "select": { "name": priority_name(priority) } }),
        );
    }
    if let Some(due_date) = patch.due_date {
        properties.insert(
            DUE_PROPERTY.to_owned(),
            json!({ "date": { "start": parse::format_date(due_date) } }),
        );
    }
    if let Some(labels) = &patch.labels {
        let options: Vec<Value> = labels
            .iter()
            .map(|label| label.trim())
            .filter(|label| !label.is_empty())
            .map(|label| json!({ "name": label }))
            .collect();
        properties.insert(TAGS_PROPERTY.to_owned(), json!({ "multi_select": options }));
    }
    if let Some(project_name) = &patch.project_name {
        let select = if project_name.trim().is_empty() {
            Value::Null
        } else {
            json!({ "name": project_name.trim() })
        };
        properties.insert(PROJECT_PROPERTY.to_owned(), json!({ "select": select }));
    }
    Value::Object(properties)
}

fn rich_text(content: &str) -> Value {
    if content.is_empty() {
        return json!([]);
    }
    json!([{ "type": "text", "text": { "content": content } }])
}
