//! Notion provider: database pages as tasks.

mod connector;
pub mod normalize;

pub use connector::{DEFAULT_NOTION_API_BASE, NOTION_VERSION, NotionConfig, NotionConnector};
