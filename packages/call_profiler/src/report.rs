//! Rendered profiling reports.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::OperationKey;

/// RFC 1123 timestamp layout, always in GMT, with English day and month names.
const START_TIME_FORMAT: &str = "%a, %-d %b %Y %H:%M:%S GMT";

const SECONDS_PER_MINUTE: u64 = 60;

/// Snapshot of the cumulative time spent in each profiled operation.
///
/// A `Report` is an immutable copy taken from a [`Profiler`](crate::Profiler). Its [`Display`]
/// form is the textual report: a header naming the session start time followed by one line per
/// operation, sorted by owning type and then by operation name.
///
/// ```text
/// Run at Thu, 1 Jan 1970 00:16:40 GMT
/// Widget.spin took 0m 7s 0ms
///
/// ```
///
/// # Examples
///
/// ```
/// use call_profiler::Profiler;
///
/// let profiler = Profiler::new();
/// let report = profiler.to_report();
///
/// assert!(report.is_empty());
/// assert!(report.to_string().starts_with("Run at "));
/// ```
///
/// [`Display`]: fmt::Display
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Report {
    start_time: DateTime<Utc>,
    totals: BTreeMap<OperationKey, Duration>,
}

impl Report {
    pub(crate) fn new(start_time: DateTime<Utc>, totals: BTreeMap<OperationKey, Duration>) -> Self {
        Self { start_time, totals }
    }

    /// The instant the profiling session started.
    #[must_use]
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Whether any profiled invocation was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Returns the recorded operations and their cumulative durations, in report order.
    ///
    /// # Examples
    ///
    /// ```
    /// use call_profiler::Profiler;
    ///
    /// let profiler = Profiler::new();
    ///
    /// for (key, total) in profiler.to_report().entries() {
    ///     println!("{key} took {total:?} in total");
    /// }
    /// ```
    pub fn entries(&self) -> impl Iterator<Item = (&OperationKey, Duration)> {
        self.totals.iter().map(|(key, total)| (key, *total))
    }

    /// The cumulative duration recorded for one operation, if it was ever invoked.
    #[must_use]
    pub fn total(&self, owner: &str, operation: &str) -> Option<Duration> {
        self.totals.get(&OperationKey::new(owner, operation)).copied()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run at {}", self.start_time.format(START_TIME_FORMAT))?;

        for (key, total) in &self.totals {
            writeln!(f, "{key} took {}", HumanDuration(*total))?;
        }

        writeln!(f)
    }
}

/// Formats a duration as whole minutes, the seconds part and the milliseconds part.
struct HumanDuration(Duration);

impl fmt::Display for HumanDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seconds = self.0.as_secs();

        write!(
            f,
            "{}m {}s {}ms",
            seconds.div_euclid(SECONDS_PER_MINUTE),
            seconds.rem_euclid(SECONDS_PER_MINUTE),
            self.0.subsec_millis()
        )
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::time::UNIX_EPOCH;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Report: Send, Sync);

    fn start_at(seconds: u64) -> DateTime<Utc> {
        DateTime::<Utc>::from(UNIX_EPOCH + Duration::from_secs(seconds))
    }

    fn report_of(entries: &[(&str, &str, Duration)]) -> Report {
        let totals = entries
            .iter()
            .map(|(owner, operation, total)| (OperationKey::new(owner, operation), *total))
            .collect();

        Report::new(start_at(1000), totals)
    }

    #[test]
    fn empty_report_has_header_only() {
        let report = report_of(&[]);

        assert!(report.is_empty());
        assert_eq!(report.to_string(), "Run at Thu, 1 Jan 1970 00:16:40 GMT\n\n");
    }

    #[test]
    fn header_uses_rfc_1123() {
        // 2026-10-19T08:05:09Z
        let report = Report::new(start_at(1_792_397_109), BTreeMap::new());

        assert_eq!(
            report.to_string(),
            "Run at Mon, 19 Oct 2026 08:05:09 GMT\n\n"
        );
    }

    #[test]
    fn lines_are_sorted_by_owner_then_operation() {
        let report = report_of(&[
            ("B", "m1", Duration::from_secs(1)),
            ("A", "m2", Duration::from_secs(2)),
            ("A", "m1", Duration::from_secs(3)),
        ]);

        assert_eq!(
            report.to_string(),
            "Run at Thu, 1 Jan 1970 00:16:40 GMT\n\
             A.m1 took 0m 3s 0ms\n\
             A.m2 took 0m 2s 0ms\n\
             B.m1 took 0m 1s 0ms\n\
             \n"
        );
    }

    #[test]
    fn duration_parts() {
        assert_eq!(HumanDuration(Duration::ZERO).to_string(), "0m 0s 0ms");
        assert_eq!(
            HumanDuration(Duration::from_millis(61_250)).to_string(),
            "1m 1s 250ms"
        );
        assert_eq!(
            HumanDuration(Duration::from_secs(3 * 3600)).to_string(),
            "180m 0s 0ms"
        );
        // Sub-millisecond precision is not printed.
        assert_eq!(
            HumanDuration(Duration::from_micros(1_999)).to_string(),
            "0m 0s 1ms"
        );
    }

    #[test]
    fn total_looks_up_by_value() {
        let report = report_of(&[("Widget", "spin", Duration::from_secs(7))]);

        assert_eq!(report.total("Widget", "spin"), Some(Duration::from_secs(7)));
        assert_eq!(report.total("Widget", "ping"), None);
        assert_eq!(report.total("Gadget", "spin"), None);
    }

    #[test]
    fn entries_follow_report_order() {
        let report = report_of(&[
            ("B", "m1", Duration::from_secs(1)),
            ("A", "m2", Duration::from_secs(2)),
        ]);

        let keys: Vec<_> = report.entries().map(|(key, _)| key.to_string()).collect();

        assert_eq!(keys, ["A.m2", "B.m1"]);
    }
}
