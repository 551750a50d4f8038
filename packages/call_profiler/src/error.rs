use std::io;
use std::time::Duration;

use thiserror::Error;

/// Errors raised by the profiling machinery itself.
///
/// Failures produced by a profiled target never appear here. They are handed back to the caller
/// unchanged as part of the value returned by [`ProfiledHandle::invoke()`][1].
///
/// [1]: crate::ProfiledHandle::invoke
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The caller asked to wrap a target whose capability set declares no profiled operation.
    ///
    /// Wrapping such a target is a caller mistake. No handle is created.
    #[error("cannot profile '{owner}': it declares no profiled operation")]
    InvalidTarget {
        /// Name of the owning type that was offered for wrapping.
        owner: String,
    },

    /// The interception mechanism could not deliver the call to the target.
    #[error("cannot intercept '{owner}.{operation}': {reason}")]
    InterceptionFailure {
        /// Name of the owning type of the wrapped target.
        owner: String,

        /// Name of the operation that was invoked.
        operation: String,

        /// A human-readable description of the problem.
        reason: String,
    },

    /// The clock reported an end instant earlier than the start instant of a timed call.
    ///
    /// The measurement is rejected and the aggregated totals are left untouched.
    #[error("clock went backwards by {regression:?} while timing '{owner}.{operation}'")]
    ClockRegression {
        /// Name of the owning type of the timed operation.
        owner: String,

        /// Name of the timed operation.
        operation: String,

        /// How far before the start instant the end instant was.
        regression: Duration,
    },

    /// Writing the rendered report to its destination failed.
    #[error("failed to write profiling report")]
    Io(#[from] io::Error),
}

/// A specialized `Result` type for profiling operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
