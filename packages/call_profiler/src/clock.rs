//! Sources of the current instant used to time intercepted calls.
//!
//! The profiler never reads the system time directly. It asks a [`Clock`], which is either the
//! real [`SystemClock`] or a clock injected by the caller through
//! [`Profiler::with_clock()`][crate::Profiler::with_clock], typically to make timing deterministic
//! in tests.

#[cfg(test)]
mod fake;

use std::fmt::Debug;
use std::sync::Arc;
use std::time::SystemTime;

#[cfg(test)]
pub(crate) use fake::FakeClock;

/// Provides the current instant to the profiler.
///
/// Implementations must be monotonic enough that the end of a single timed call is never earlier
/// than its start. A clock that goes backwards is treated as a defect: the affected measurement
/// is rejected with [`Error::ClockRegression`][crate::Error::ClockRegression].
///
/// The same clock also supplies the session start time printed in the report header.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Debug + Send + Sync + 'static {
    /// Returns the current instant.
    fn now(&self) -> SystemTime;
}

/// The operating system wall clock.
#[derive(Clone, Copy, Debug, Default)]
#[non_exhaustive]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg_attr(test, mutants::skip)] // Trivial fn, tested via the facade - skip mutating.
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Dispatches to the system clock or to a clock injected by the caller.
///
/// Two facades are equal when they refer to the same clock instance, which is what the
/// interceptor identity comparison relies on.
#[derive(Clone, Debug)]
pub(crate) enum ClockFacade {
    System(SystemClock),
    Injected(Arc<dyn Clock>),
}

impl ClockFacade {
    pub(crate) const fn system() -> Self {
        Self::System(SystemClock)
    }

    pub(crate) fn injected(clock: impl Clock) -> Self {
        Self::Injected(Arc::new(clock))
    }
}

impl Clock for ClockFacade {
    fn now(&self) -> SystemTime {
        match self {
            Self::System(clock) => clock.now(),
            Self::Injected(clock) => clock.now(),
        }
    }
}

impl PartialEq for ClockFacade {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::System(_), Self::System(_)) => true,
            (Self::Injected(a), Self::Injected(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for ClockFacade {}
