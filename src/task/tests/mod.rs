//! Unit tests for the task aggregation module.

mod domain_tests;

use chrono::{DateTime, Local, TimeZone, Utc};
use std::sync::Mutex;
use std::time::Duration;

/// Clock that only moves when a test advances it.
#[derive(Debug)]
pub(crate) struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub(crate) fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub(crate) fn advance(&self, step: Duration) {
        let mut now = self.now.lock().expect("clock lock should not be poisoned");
        *now += chrono::Duration::from_std(step).expect("step should fit chrono range");
    }
}

impl mockable::Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock should not be poisoned")
    }
}

pub(crate) fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, hour, minute, 0)
        .single()
        .expect("valid test timestamp")
}
