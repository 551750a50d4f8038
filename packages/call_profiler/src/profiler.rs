use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::clock::{Clock, ClockFacade};
use crate::interceptor::Interceptor;
use crate::state::ProfilingState;
use crate::{CapabilitySet, Error, ProfiledHandle, Report, Result};

/// A profiling session: wraps targets and accumulates the time spent in their profiled
/// operations.
///
/// All handles created by one profiler share the same totals and the same session start time.
/// The start time is taken from the profiler's clock when the profiler is created.
///
/// # Examples
///
/// ```
/// use call_profiler::{CapabilitySet, Profiler};
///
/// struct Fetcher;
///
/// impl Fetcher {
///     fn fetch(&self, url: &str) -> usize {
///         url.len()
///     }
/// }
///
/// let profiler = Profiler::new();
/// let fetcher = Fetcher;
/// let handle = profiler
///     .wrap(CapabilitySet::of::<Fetcher>().profiled("fetch"), &fetcher)
///     .unwrap();
///
/// for url in ["https://example.com", "https://example.org"] {
///     handle.invoke("fetch", |f| f.fetch(url)).unwrap();
/// }
///
/// // Run at <start time>
/// // Fetcher.fetch took 0m 0s 0ms
/// print!("{}", profiler.render());
/// ```
#[derive(Debug)]
pub struct Profiler {
    clock: ClockFacade,
    state: Arc<ProfilingState>,
    start_time: DateTime<Utc>,
}

impl Profiler {
    /// Creates a profiling session timed by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::from_clock(ClockFacade::system())
    }

    /// Creates a profiling session timed by `clock`.
    ///
    /// This is how tests make timings deterministic.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::{Duration, SystemTime, UNIX_EPOCH};
    ///
    /// use call_profiler::{Clock, Profiler};
    ///
    /// #[derive(Debug)]
    /// struct FrozenClock;
    ///
    /// impl Clock for FrozenClock {
    ///     fn now(&self) -> SystemTime {
    ///         UNIX_EPOCH + Duration::from_secs(1000)
    ///     }
    /// }
    ///
    /// let profiler = Profiler::with_clock(FrozenClock);
    ///
    /// assert_eq!(
    ///     profiler.render(),
    ///     "Run at Thu, 1 Jan 1970 00:16:40 GMT\n\n"
    /// );
    /// ```
    #[must_use]
    pub fn with_clock(clock: impl Clock) -> Self {
        Self::from_clock(ClockFacade::injected(clock))
    }

    fn from_clock(clock: ClockFacade) -> Self {
        let start_time = DateTime::<Utc>::from(clock.now());

        Self {
            clock,
            state: Arc::new(ProfilingState::default()),
            start_time,
        }
    }

    /// Wraps `target` so that calls to its profiled operations are timed.
    ///
    /// `capabilities` declares the operations of the target and marks the profiled ones. It can
    /// be passed by value or as an `Arc` to share one declaration between many wraps. Creating
    /// the handle records nothing; recording starts with the first profiled invocation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTarget`] if `capabilities` declares no profiled operation.
    pub fn wrap<'t, T: ?Sized>(
        &self,
        capabilities: impl Into<Arc<CapabilitySet>>,
        target: &'t T,
    ) -> Result<ProfiledHandle<'t, T>> {
        let capabilities = capabilities.into();

        if !capabilities.has_profiled_operation() {
            return Err(Error::InvalidTarget {
                owner: capabilities.owner().to_string(),
            });
        }

        debug!(owner = capabilities.owner(), "wrapping target for profiling");

        Ok(ProfiledHandle::new(Interceptor::new(
            self.clock.clone(),
            target,
            Arc::clone(&self.state),
            self.start_time,
            capabilities,
        )))
    }

    /// The instant the session started, as reported by the profiler's clock.
    #[must_use]
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Takes a snapshot of the totals recorded so far.
    #[must_use]
    pub fn to_report(&self) -> Report {
        self.state.to_report(self.start_time)
    }

    /// Renders the totals recorded so far as report text.
    ///
    /// Rendering does not change the totals; rendering twice without intervening invocations
    /// yields identical text.
    #[must_use]
    pub fn render(&self) -> String {
        self.state.render(self.start_time)
    }

    /// Writes the rendered report to `writer` with a single write and flushes it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if writing or flushing fails.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(self.render().as_bytes())?;
        writer.flush()?;

        Ok(())
    }

    /// Appends the rendered report to the file at `path`, creating the file if needed.
    ///
    /// The whole report is written with one append so reports from consecutive sessions follow
    /// each other intact.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be opened or written.
    pub fn append_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        self.write_to(&mut file)?;

        debug!(path = %path.display(), "appended profiling report");

        Ok(())
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Profiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_report())
    }
}
