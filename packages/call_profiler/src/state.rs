use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};

use crate::{ERR_POISONED_LOCK, Error, OperationKey, Report, Result};

/// Cumulative duration per operation, shared by every handle of one profiling session.
///
/// Totals only ever grow. Each record is a single read-modify-write under one lock, so concurrent
/// recorders never lose an update. Keys are kept ordered so a report needs no extra sorting.
#[derive(Debug, Default)]
pub(crate) struct ProfilingState {
    totals: Mutex<BTreeMap<OperationKey, Duration>>,
}

impl ProfilingState {
    /// Adds the time between `started` and `finished` to the total of `key`.
    ///
    /// Returns the recorded duration. If `finished` is earlier than `started` the clock has
    /// regressed; the measurement is rejected and the totals are left unchanged.
    pub(crate) fn record(
        &self,
        key: &OperationKey,
        started: SystemTime,
        finished: SystemTime,
    ) -> Result<Duration> {
        let elapsed = finished
            .duration_since(started)
            .map_err(|e| Error::ClockRegression {
                owner: key.owner().to_string(),
                operation: key.operation().to_string(),
                regression: e.duration(),
            })?;

        self.add(key, elapsed);

        Ok(elapsed)
    }

    fn add(&self, key: &OperationKey, elapsed: Duration) {
        let mut totals = self.totals.lock().expect(ERR_POISONED_LOCK);

        if let Some(total) = totals.get_mut(key) {
            *total = total.checked_add(elapsed).expect(
                "profiled time accumulation overflows Duration - this indicates an unrealistic scenario",
            );
        } else {
            totals.insert(key.clone(), elapsed);
        }
    }

    /// Takes a snapshot of the current totals.
    pub(crate) fn to_report(&self, start_time: DateTime<Utc>) -> Report {
        let totals = self.totals.lock().expect(ERR_POISONED_LOCK).clone();

        Report::new(start_time, totals)
    }

    /// Renders the current totals as report text.
    pub(crate) fn render(&self, start_time: DateTime<Utc>) -> String {
        self.to_report(start_time).to_string()
    }
}
