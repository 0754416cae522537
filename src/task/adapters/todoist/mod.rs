//! Todoist provider: a flat task list.

mod connector;
pub mod normalize;

pub use connector::{DEFAULT_TODOIST_API_BASE, TodoistConfig, TodoistConnector};
