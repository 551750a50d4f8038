//! Fake clock implementation for testing.

use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use crate::clock::Clock;

/// Fake clock whose instant only changes when a test moves it.
///
/// Multiple clones of the same `FakeClock` share the same underlying instant, so a test can keep
/// one clone and move time while the profiler (or a target) holds another.
#[derive(Clone, Debug)]
pub(crate) struct FakeClock {
    now: Arc<Mutex<SystemTime>>,
}

impl FakeClock {
    /// Creates a fake clock that reports `start` until moved.
    pub(crate) fn new(start: SystemTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Moves the clock forward by `duration`.
    pub(crate) fn advance(&self, duration: Duration) {
        let mut now = self
            .now
            .lock()
            .expect("FakeClock state lock should not be poisoned");

        *now = now
            .checked_add(duration)
            .expect("advancing the fake clock overflows SystemTime");
    }

    /// Moves the clock backward by `duration`, simulating a broken clock.
    pub(crate) fn rewind(&self, duration: Duration) {
        let mut now = self
            .now
            .lock()
            .expect("FakeClock state lock should not be poisoned");

        *now = now
            .checked_sub(duration)
            .expect("rewinding the fake clock underflows SystemTime");
    }
}

impl Clock for FakeClock {
    fn now(&self) -> SystemTime {
        *self
            .now
            .lock()
            .expect("FakeClock state lock should not be poisoned")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::time::UNIX_EPOCH;

    use super::*;

    #[test]
    fn reports_start_until_moved() {
        let clock = FakeClock::new(UNIX_EPOCH + Duration::from_secs(1000));

        assert_eq!(clock.now(), UNIX_EPOCH + Duration::from_secs(1000));
        assert_eq!(clock.now(), UNIX_EPOCH + Duration::from_secs(1000));
    }

    #[test]
    fn advance_and_rewind() {
        let clock = FakeClock::new(UNIX_EPOCH + Duration::from_secs(10));

        clock.advance(Duration::from_secs(5));
        assert_eq!(clock.now(), UNIX_EPOCH + Duration::from_secs(15));

        clock.rewind(Duration::from_secs(7));
        assert_eq!(clock.now(), UNIX_EPOCH + Duration::from_secs(8));
    }

    #[test]
    fn shared_state_between_clones() {
        let clock1 = FakeClock::new(UNIX_EPOCH);
        let clock2 = clock1.clone();

        clock1.advance(Duration::from_millis(100));
        assert_eq!(clock2.now(), UNIX_EPOCH + Duration::from_millis(100));
    }
}
