//! Provider origin tags.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// External provider that owns a canonical task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOrigin {
    /// Notion database pages.
    Notion,
    /// Todoist tasks.
    Todoist,
}

impl TaskOrigin {
    /// Every supported origin, in aggregation order.
    pub const ALL: [Self; 2] = [Self::Notion, Self::Todoist];

    /// Returns the origin tag in canonical form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Notion => "notion",
            Self::Todoist => "todoist",
        }
    }
}

impl TryFrom<&str> for TaskOrigin {
    type Error = TaskDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "notion" => Ok(Self::Notion),
            "todoist" => Ok(Self::Todoist),
            _ => Err(TaskDomainError::UnsupportedOrigin(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
