//! Canonical task model shared by every provider.
//!
//! Provider-specific shapes never cross this boundary: normalisers convert
//! raw provider records into [`Task`] values and write inputs
//! ([`NewTask`], [`TaskPatch`]) into provider payloads.

mod error;
mod fields;
mod ids;
mod origin;
mod task;

pub use error::TaskDomainError;
pub use fields::{NewTask, TaskPatch};
pub use ids::{ProviderId, TaskId};
pub use origin::TaskOrigin;
pub use task::{Task, TaskPriority, TaskRecord, TaskStatus, UNTITLED_TASK};
