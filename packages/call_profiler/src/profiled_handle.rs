use std::fmt;

use crate::interceptor::Interceptor;
use crate::{CapabilitySet, Result};

/// A profiled view of a target, created by [`Profiler::wrap()`][crate::Profiler::wrap].
///
/// Every call made through [`invoke()`](Self::invoke) passes through the profiler's interceptor.
/// Calls to profiled operations are timed and added to the session totals; all other calls are
/// forwarded untouched. The handle borrows the target and never owns it, so the caller keeps
/// full control of the target's lifetime.
///
/// To expose the same API as the target, implement the target's trait for the handle and route
/// each method through `invoke()`:
///
/// ```
/// use call_profiler::{CapabilitySet, Profiler, ProfiledHandle};
///
/// trait Spinner {
///     fn spin(&self, turns: u32) -> u32;
/// }
///
/// struct Widget;
///
/// impl Spinner for Widget {
///     fn spin(&self, turns: u32) -> u32 {
///         turns * 2
///     }
/// }
///
/// impl Spinner for ProfiledHandle<'_, Widget> {
///     fn spin(&self, turns: u32) -> u32 {
///         self.invoke("spin", |widget| widget.spin(turns))
///             .expect("spin is declared by the capability set")
///     }
/// }
///
/// let profiler = Profiler::new();
/// let widget = Widget;
/// let handle = profiler
///     .wrap(CapabilitySet::of::<Widget>().profiled("spin"), &widget)
///     .unwrap();
///
/// assert_eq!(handle.spin(21), 42);
/// assert!(profiler.to_report().total("Widget", "spin").is_some());
/// ```
///
/// # Thread safety
///
/// A handle can be shared between threads whenever the target can. All handles of one
/// [`Profiler`](crate::Profiler) feed the same totals.
pub struct ProfiledHandle<'t, T: ?Sized> {
    interceptor: Interceptor<'t, T>,
}

impl<'t, T: ?Sized> ProfiledHandle<'t, T> {
    pub(crate) fn new(interceptor: Interceptor<'t, T>) -> Self {
        Self { interceptor }
    }

    /// Invokes `operation` on the target through `call`.
    ///
    /// `call` receives the target and performs the real call synchronously on the current
    /// thread. Whatever it returns, including a failure value produced by the target, is handed
    /// back unchanged inside `Ok`. If `operation` is profiled, the time `call` took is added to
    /// the session totals, also when `call` fails or panics. A panic continues to unwind to the
    /// caller after the time is recorded.
    ///
    /// # Errors
    ///
    /// Only failures of the profiling mechanism itself are reported as errors:
    ///
    /// * [`Error::InterceptionFailure`][crate::Error::InterceptionFailure] if the capability set
    ///   does not declare `operation`. `call` is not run.
    /// * [`Error::ClockRegression`][crate::Error::ClockRegression] if the clock went backwards
    ///   during a profiled call. `call` has run but its result is discarded and nothing is
    ///   recorded.
    ///
    /// # Examples
    ///
    /// ```
    /// use call_profiler::{CapabilitySet, Profiler};
    ///
    /// let profiler = Profiler::new();
    /// let numbers = vec![3, 1, 2];
    /// let handle = profiler
    ///     .wrap(
    ///         CapabilitySet::named("Numbers").profiled("parse").unprofiled("len"),
    ///         &numbers,
    ///     )
    ///     .unwrap();
    ///
    /// // The target's own failure is the inner result.
    /// let parsed = handle.invoke("parse", |_| "x".parse::<u32>()).unwrap();
    /// assert!(parsed.is_err());
    ///
    /// assert_eq!(handle.invoke("len", |n| n.len()).unwrap(), 3);
    /// ```
    pub fn invoke<R>(&self, operation: &str, call: impl FnOnce(&'t T) -> R) -> Result<R> {
        self.interceptor.intercept(operation, call)
    }

    /// The capability set the handle was created with.
    #[must_use]
    pub fn capabilities(&self) -> &CapabilitySet {
        self.interceptor.capabilities()
    }
}

impl<T: ?Sized> Clone for ProfiledHandle<'_, T> {
    fn clone(&self) -> Self {
        Self {
            interceptor: self.interceptor.clone(),
        }
    }
}

impl<T: ?Sized> PartialEq for ProfiledHandle<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.interceptor == other.interceptor
    }
}

impl<T: ?Sized> Eq for ProfiledHandle<'_, T> {}

impl<T: ?Sized> fmt::Debug for ProfiledHandle<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfiledHandle")
            .field("interceptor", &self.interceptor)
            .finish()
    }
}
