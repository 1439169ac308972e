use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of timestamps for a [`Profiler`](crate::Profiler).
///
/// `now` must be cheap and side-effect free; `elapsed` must never be negative.
pub trait Clock {
    type Stamp: Copy;

    fn now(&self) -> Self::Stamp;

    /// Duration between two stamps, saturating at zero.
    fn elapsed(&self, start: Self::Stamp, end: Self::Stamp) -> Duration;
}

/// The default clock: [`std::time::Instant`], which is monotonic on every
/// platform std supports.
#[derive(Debug, Default, Clone, Copy)]
pub struct Monotonic;

impl Clock for Monotonic {
    type Stamp = Instant;

    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }

    #[inline]
    fn elapsed(&self, start: Instant, end: Instant) -> Duration {
        end.saturating_duration_since(start)
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle and advance it
/// while the profiler owns another:
///
/// ```rust
/// use std::time::Duration;
/// use timed_block::{ManualClock, Profiler, ProfilerConfig, PrintMode};
///
/// let clock = ManualClock::default();
/// let mut p = Profiler::with_clock(clock.clone(), ProfilerConfig::default().print_mode(PrintMode::Disabled));
/// for _ in p.block("tick", 4).unwrap() {
///     clock.advance(Duration::from_micros(5));
/// }
/// assert_eq!(p.history().last().unwrap().elapsed(), Duration::from_micros(20));
/// ```
#[derive(Debug, Default, Clone)]
pub struct ManualClock(Rc<Cell<Duration>>);

impl ManualClock {
    pub fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }

    pub fn set(&self, to: Duration) {
        self.0.set(to);
    }

    pub fn get(&self) -> Duration {
        self.0.get()
    }
}

impl Clock for ManualClock {
    type Stamp = Duration;

    fn now(&self) -> Duration {
        self.0.get()
    }

    fn elapsed(&self, start: Duration, end: Duration) -> Duration {
        end.saturating_sub(start)
    }
}
