//! Canonical task record and its lifecycle enums.

use super::{ProviderId, TaskId, TaskOrigin};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Title substituted when a provider record has no usable title text.
pub const UNTITLED_TASK: &str = "Untitled";

/// Canonical three-state task lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Work has not started.
    #[default]
    Todo,
    /// Work is underway.
    InProgress,
    /// Work is finished.
    Done,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    /// Matches free-form provider text against the status synonym table.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Returns `None` for unrecognised text so callers pick the default
    /// explicitly.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_lowercase();
        match normalized.as_str() {
            "todo" | "to do" | "to-do" | "not started" | "backlog" | "open" | "pending" => {
                Some(Self::Todo)
            }
            "in progress" | "in-progress" | "in_progress" | "doing" | "started" | "active"
            | "in review" => Some(Self::InProgress),
            "done" | "complete" | "completed" | "closed" | "finished" | "resolved" => {
                Some(Self::Done)
            }
            _ => None,
        }
    }

    /// Returns `true` for the terminal state.
    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical four-level priority.
///
/// The derived ordering sorts the most pressing work first:
/// `Urgent < High < Medium < Low`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Needs attention now.
    Urgent,
    /// Important.
    High,
    /// Normal.
    #[default]
    Medium,
    /// Can wait.
    Low,
}

impl TaskPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Matches free-form provider text against the priority synonym table.
    ///
    /// Returns `None` for unrecognised text.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_lowercase();
        match normalized.as_str() {
            "urgent" | "critical" | "highest" | "p0" => Some(Self::Urgent),
            "high" | "p1" => Some(Self::High),
            "medium" | "normal" | "p2" => Some(Self::Medium),
            "low" | "lowest" | "minor" | "p3" => Some(Self::Low),
            _ => None,
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical task exchanged between all components.
///
/// Instances are only built through [`Task::from_record`], which enforces
/// the field invariants: the title is never blank, optional text is absent
/// rather than empty, and an empty label set is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    origin: TaskOrigin,
    provider_id: ProviderId,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    status: TaskStatus,
    priority: TaskPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    due_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    labels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    project_name: Option<String>,
}

/// Parameter object carrying the raw field values of a task.
///
/// Normalisers fill one of these from provider data and hand it to
/// [`Task::from_record`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    /// Owning provider.
    pub origin: TaskOrigin,
    /// Identifier inside the owning provider.
    pub provider_id: ProviderId,
    /// Title text, possibly blank.
    pub title: String,
    /// Description text, possibly blank.
    pub description: Option<String>,
    /// Lifecycle state.
    pub status: TaskStatus,
    /// Priority level.
    pub priority: TaskPriority,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last edit timestamp; `None` when the provider does not track edits.
    pub updated_at: Option<DateTime<Utc>>,
    /// Label names, possibly empty or blank.
    pub labels: Vec<String>,
    /// Project name, possibly blank.
    pub project_name: Option<String>,
}

impl Task {
    /// Builds a canonical task, applying every field default.
    #[must_use]
    pub fn from_record(record: TaskRecord) -> Self {
        let title = if record.title.trim().is_empty() {
            UNTITLED_TASK.to_owned()
        } else {
            record.title
        };
        let labels: Vec<String> = record
            .labels
            .into_iter()
            .map(|label| label.trim().to_owned())
            .filter(|label| !label.is_empty())
            .collect();

        Self {
            id: TaskId::derive(record.origin, &record.provider_id),
            origin: record.origin,
            provider_id: record.provider_id,
            title,
            description: non_blank(record.description),
            status: record.status,
            priority: record.priority,
            due_date: record.due_date,
            created_at: record.created_at,
            updated_at: record.updated_at.unwrap_or(record.created_at),
            labels: (!labels.is_empty()).then_some(labels),
            project_name: non_blank(record.project_name),
        }
    }

    /// Decomposes the task back into its field values.
    #[must_use]
    pub fn into_record(self) -> TaskRecord {
        TaskRecord {
            origin: self.origin,
            provider_id: self.provider_id,
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            due_date: self.due_date,
            created_at: self.created_at,
            updated_at: Some(self.updated_at),
            labels: self.labels.unwrap_or_default(),
            project_name: self.project_name,
        }
    }

    /// Returns a copy of the task with its status replaced.
    #[must_use]
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns the canonical identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the owning provider.
    #[must_use]
    pub const fn origin(&self) -> TaskOrigin {
        self.origin
    }

    /// Returns the identifier inside the owning provider.
    #[must_use]
    pub const fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest edit timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the labels; `None` when the task carries none.
    #[must_use]
    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    /// Returns the project name, if any.
    #[must_use]
    pub fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
