//! Single-slot snapshot cache for the merged task list.

use crate::task::domain::Task;
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Default snapshot lifetime.
pub const DEFAULT_SNAPSHOT_TTL: Duration = Duration::from_secs(30);

/// Immutable, timestamped copy of the merged task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSnapshot {
    tasks: Vec<Task>,
    captured_at: DateTime<Utc>,
}

impl TaskSnapshot {
    /// Creates a snapshot captured at `captured_at`.
    #[must_use]
    pub const fn new(tasks: Vec<Task>, captured_at: DateTime<Utc>) -> Self {
        Self { tasks, captured_at }
    }

    /// Returns the merged tasks in aggregation order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns the capture timestamp.
    #[must_use]
    pub const fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Returns `true` while the snapshot is younger than `ttl` at `now`.
    ///
    /// A capture time ahead of `now` counts as fresh.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.captured_at)
            .to_std()
            .map_or(true, |age| age < ttl)
    }
}

/// Snapshot slot owned by one aggregation service.
///
/// The slot is only ever replaced or cleared as a whole; readers clone the
/// inner `Arc` and never see a half-written snapshot. Concurrent stores race
/// and the last one wins.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    slot: RwLock<Option<Arc<TaskSnapshot>>>,
}

impl SnapshotCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current snapshot if it is still fresh at `now`.
    #[must_use]
    pub fn fresh(&self, now: DateTime<Utc>, ttl: Duration) -> Option<Arc<TaskSnapshot>> {
        self.current().filter(|snapshot| snapshot.is_fresh(now, ttl))
    }

    /// Returns the current snapshot regardless of age.
    #[must_use]
    pub fn current(&self) -> Option<Arc<TaskSnapshot>> {
        match self.slot.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replaces the current snapshot and returns the shared copy.
    #[must_use]
    pub fn store(&self, snapshot: TaskSnapshot) -> Arc<TaskSnapshot> {
        let shared = Arc::new(snapshot);
        self.swap(Some(Arc::clone(&shared)));
        shared
    }

    /// Discards the current snapshot. Idempotent.
    pub fn invalidate(&self) {
        self.swap(None);
    }

    fn swap(&self, value: Option<Arc<TaskSnapshot>>) {
        match self.slot.write() {
            Ok(mut guard) => *guard = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }
}
