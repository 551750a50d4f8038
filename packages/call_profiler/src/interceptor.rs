//! Routing of individual calls to a wrapped target, timing the profiled ones.

use std::fmt;
use std::ptr;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use tracing::{error, trace};

use crate::clock::{Clock, ClockFacade};
use crate::state::ProfilingState;
use crate::{CapabilitySet, Error, OperationKey, Result};

/// Evaluates every invocation on a wrapped target independently.
///
/// For each call the interceptor looks up whether the operation is profiled, captures the start
/// instant if it is, delegates to the target on the caller's thread and records the elapsed time
/// whether the target returned normally, returned a failure or panicked.
pub(crate) struct Interceptor<'t, T: ?Sized> {
    clock: ClockFacade,
    target: &'t T,
    state: Arc<ProfilingState>,
    start_time: DateTime<Utc>,
    capabilities: Arc<CapabilitySet>,
}

impl<'t, T: ?Sized> Interceptor<'t, T> {
    pub(crate) fn new(
        clock: ClockFacade,
        target: &'t T,
        state: Arc<ProfilingState>,
        start_time: DateTime<Utc>,
        capabilities: Arc<CapabilitySet>,
    ) -> Self {
        Self {
            clock,
            target,
            state,
            start_time,
            capabilities,
        }
    }

    pub(crate) fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    /// Delivers one call to the target.
    ///
    /// The value produced by `call` is returned untouched. A panic raised by `call` continues
    /// to unwind after the elapsed time has been recorded.
    pub(crate) fn intercept<R>(&self, operation: &str, call: impl FnOnce(&'t T) -> R) -> Result<R> {
        let declared = self.capabilities.find(operation).ok_or_else(|| {
            Error::InterceptionFailure {
                owner: self.capabilities.owner().to_string(),
                operation: operation.to_string(),
                reason: "the operation is not declared by the capability set".to_string(),
            }
        })?;

        if !declared.is_profiled() {
            return Ok(call(self.target));
        }

        let span = InvocationSpan::start(&self.clock, &self.state, declared.key());
        let result = call(self.target);
        span.finish()?;

        Ok(result)
    }
}

impl<T: ?Sized> Clone for Interceptor<'_, T> {
    fn clone(&self) -> Self {
        Self {
            clock: self.clock.clone(),
            target: self.target,
            state: Arc::clone(&self.state),
            start_time: self.start_time,
            capabilities: Arc::clone(&self.capabilities),
        }
    }
}

// Identity: same clock, same target instance, same aggregation store, same session start.
impl<T: ?Sized> PartialEq for Interceptor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.clock == other.clock
            && ptr::eq(self.target, other.target)
            && Arc::ptr_eq(&self.state, &other.state)
            && self.start_time == other.start_time
    }
}

impl<T: ?Sized> Eq for Interceptor<'_, T> {}

impl<T: ?Sized> fmt::Debug for Interceptor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("owner", &self.capabilities.owner())
            .field("clock", &self.clock)
            .field("start_time", &self.start_time)
            .finish_non_exhaustive()
    }
}

/// Measures one profiled invocation from creation until it is finished or dropped.
///
/// Dropping an unfinished span only happens while the delegated call is unwinding. The time
/// is still recorded in that case so that panicking calls are accounted for.
#[must_use = "Measurements are taken between creation and finish or drop"]
struct InvocationSpan<'a> {
    clock: &'a ClockFacade,
    state: &'a ProfilingState,
    key: &'a OperationKey,
    started: SystemTime,
    finished: bool,
}

impl<'a> InvocationSpan<'a> {
    fn start(clock: &'a ClockFacade, state: &'a ProfilingState, key: &'a OperationKey) -> Self {
        Self {
            clock,
            state,
            key,
            started: clock.now(),
            finished: false,
        }
    }

    fn finish(mut self) -> Result<Duration> {
        self.finished = true;
        self.record()
    }

    fn record(&self) -> Result<Duration> {
        let elapsed = self.state.record(self.key, self.started, self.clock.now())?;

        trace!(
            owner = self.key.owner(),
            operation = self.key.operation(),
            ?elapsed,
            "recorded profiled invocation"
        );

        Ok(elapsed)
    }
}

impl Drop for InvocationSpan<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        // The original panic keeps unwinding; a rejected measurement can only be reported here.
        if let Err(error) = self.record() {
            error!(%error, "discarded timing of a panicking invocation");
        }
    }
}
