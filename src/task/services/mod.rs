//! Application services for task aggregation and write routing.

mod aggregation;
mod cache;

pub use aggregation::{
    AggregatedTasks, SourceFailure, TaskAggregationError, TaskAggregationResult,
    TaskAggregationService,
};
pub use cache::{DEFAULT_SNAPSHOT_TTL, SnapshotCache, TaskSnapshot};
