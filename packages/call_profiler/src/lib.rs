#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Transparent call interception that measures how long selected operations of an existing
//! object take, without changing that object.
//!
//! A [`Profiler`] is one profiling session. It wraps a target together with a [`CapabilitySet`]
//! that declares the target's operations and marks which of them are profiled. Every call made
//! through the resulting [`ProfiledHandle`] is routed through an interceptor:
//!
//! * calls to profiled operations are timed with the session clock and their duration is added
//!   to a per-operation total, also when the call fails or panics;
//! * all other calls are forwarded untouched;
//! * the target's own results and failures always reach the caller unchanged.
//!
//! The totals can be rendered as a deterministic, sorted text report and written to any
//! [`Write`](std::io::Write) destination or appended to a file.
//!
//! This package only measures cumulative wall-clock time. It does not sample, does not keep
//! distributions and does not aggregate across processes.
//!
//! # Example
//!
//! ```
//! use call_profiler::{CapabilitySet, Profiler};
//!
//! struct Widget;
//!
//! impl Widget {
//!     fn spin(&self) -> u32 {
//!         (0..1000).sum()
//!     }
//!
//!     fn ping(&self) -> &'static str {
//!         "pong"
//!     }
//! }
//!
//! let profiler = Profiler::new();
//! let widget = Widget;
//!
//! let handle = profiler
//!     .wrap(
//!         CapabilitySet::of::<Widget>().profiled("spin").unprofiled("ping"),
//!         &widget,
//!     )
//!     .unwrap();
//!
//! handle.invoke("spin", Widget::spin).unwrap();
//! handle.invoke("spin", Widget::spin).unwrap();
//! assert_eq!(handle.invoke("ping", Widget::ping).unwrap(), "pong");
//!
//! let report = profiler.to_report();
//! assert!(report.total("Widget", "spin").is_some());
//! assert!(report.total("Widget", "ping").is_none());
//!
//! print!("{report}");
//! ```
//!
//! # Errors
//!
//! Failures of the profiling mechanism are reported through [`Error`] and are kept apart from
//! the target's own failures:
//!
//! * wrapping a target that declares nothing to profile is [`Error::InvalidTarget`];
//! * invoking an operation the capability set does not declare is
//!   [`Error::InterceptionFailure`];
//! * a clock that runs backwards during a profiled call is [`Error::ClockRegression`].
//!
//! # Threading
//!
//! Interception runs synchronously on the caller's thread. Handles may be used from many threads
//! at once; every completed profiled call is counted exactly once.
//!
//! # Logging
//!
//! The package emits [`tracing`] events: `debug` when a target is wrapped or a report is
//! appended to a file, `trace` for every recorded invocation. It never installs a subscriber.

mod capabilities;
mod clock;
mod error;
mod interceptor;
mod operation_key;
mod profiled_handle;
mod profiler;
mod report;
mod state;

pub use capabilities::{CapabilitySet, DeclaredOperation};
pub use clock::{Clock, SystemClock};
pub use error::Error;
pub(crate) use error::Result;
pub use operation_key::OperationKey;
pub use profiled_handle::ProfiledHandle;
pub use profiler::Profiler;
pub use report::Report;

pub(crate) const ERR_POISONED_LOCK: &str =
    "poisoned lock - cannot continue execution because correctness can no longer be guaranteed";
