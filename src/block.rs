use std::iter::FusedIterator;
use std::num::NonZeroU64;

#[cfg(all(feature = "counters", target_os = "linux"))]
use crate::counters::CounterGroup;
use crate::error::{ProfileError, Result};
use crate::timer::Clock;
use crate::{print, Measurement, Profiler, Recorded};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Running,
    Finished,
}

/// A counted, timed loop - starts the clock on construction, stops it and
/// records a [`Measurement`] when the last index has been handed out.
///
/// Yields `0..iterations`. Leaving the loop early (`break`, `?`, a panic in
/// the body) drops the block while it is still running; nothing is recorded.
///
/// ```rust
/// use timed_block::*;
///
/// let mut p = Profiler::with_config(ProfilerConfig::default().print_mode(PrintMode::Disabled));
/// let mut acc = 0u64;
/// for i in p.block("sum", 1000).unwrap() {
///     acc = black_box(acc + i);
/// }
/// assert_eq!(p.history().len(), 1);
/// ```
pub struct TimedBlock<'p, C: Clock> {
    profiler: &'p mut Profiler<C>,
    title: String,
    iterations: NonZeroU64,
    current: u64,
    state: State,
    outcome: Option<Result<Measurement>>,
    #[cfg(all(feature = "counters", target_os = "linux"))]
    counters: Option<CounterGroup>,
    start: C::Stamp,
}

impl<'p, C: Clock> TimedBlock<'p, C> {
    pub(crate) fn start(profiler: &'p mut Profiler<C>, title: String, iterations: NonZeroU64) -> Self {
        log::trace!("starting {:?} ({} iterations)", title, iterations);

        #[cfg(all(feature = "counters", target_os = "linux"))]
        let counters = if profiler.config.counters {
            CounterGroup::open_or_none().and_then(|mut group| match group.start() {
                Ok(()) => Some(group),
                Err(err) => {
                    log::warn!("starting: {}", ProfileError::from(err));
                    None
                }
            })
        } else {
            None
        };

        // last thing before handing control to the body
        let start = profiler.clock.now();
        Self {
            profiler,
            title,
            iterations,
            current: 0,
            state: State::Running,
            outcome: None,
            #[cfg(all(feature = "counters", target_os = "linux"))]
            counters,
            start,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn iterations(&self) -> u64 {
        self.iterations.get()
    }

    /// Iterations handed out so far.
    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn is_finished(&self) -> bool {
        self.state == State::Finished
    }

    /// The outcome once the loop has run to completion: the measurement as
    /// stored in the history, or why it is not there
    /// ([`ProfileError::NotRecorded`], [`ProfileError::HistoryOverflow`]).
    /// `None` while running.
    pub fn result(&self) -> Option<std::result::Result<&Measurement, &ProfileError>> {
        self.outcome.as_ref().map(|res| res.as_ref())
    }

    pub(crate) fn take_result(&mut self) -> Option<Result<Measurement>> {
        self.outcome.take()
    }

    fn finish(&mut self) {
        let end = self.profiler.clock.now();
        self.state = State::Finished;
        let elapsed = self.profiler.clock.elapsed(self.start, end);

        #[allow(unused_mut)]
        let mut m = Measurement::new(self.title.clone(), self.iterations, elapsed);

        #[cfg(all(feature = "counters", target_os = "linux"))]
        if let Some(mut group) = self.counters.take() {
            match group.stop() {
                Ok(()) => m = m.with_counters(group.readings(self.iterations.get())),
                Err(err) => log::warn!("stopping: {}", ProfileError::from(err)),
            }
        }

        log::debug!("finished {:?} in {:?}", m.title(), elapsed);
        print::print(&m, self.profiler.config.print_mode);
        let outcome = match self.profiler.history.record(m.clone()) {
            Ok(Recorded::Stored) => Ok(m),
            Ok(Recorded::Dropped) => Err(ProfileError::NotRecorded { measurement: Box::new(m) }),
            Err(err) => {
                log::error!("could not record {:?}: {}", m.title(), err);
                Err(err)
            }
        };
        self.outcome = Some(outcome);
    }
}

impl<C: Clock> Iterator for TimedBlock<'_, C> {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<u64> {
        match self.state {
            State::Finished => None,
            State::Running if self.current != self.iterations.get() => {
                let i = self.current;
                self.current += 1;
                Some(i)
            }
            State::Running => {
                self.finish();
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.state {
            State::Running => remaining_hint(self.iterations.get() - self.current),
            State::Finished => (0, Some(0)),
        }
    }
}

fn remaining_hint(left: u64) -> (usize, Option<usize>) {
    match usize::try_from(left) {
        Ok(n) => (n, Some(n)),
        Err(_) => (usize::MAX, None),
    }
}

// every u64 count fits
#[cfg(target_pointer_width = "64")]
impl<C: Clock> ExactSizeIterator for TimedBlock<'_, C> {}
impl<C: Clock> FusedIterator for TimedBlock<'_, C> {}

impl<C: Clock> Drop for TimedBlock<'_, C> {
    fn drop(&mut self) {
        if self.state == State::Running {
            log::debug!(
                "discarding {:?} after {} of {} iterations",
                self.title,
                self.current,
                self.iterations
            );
            #[cfg(all(feature = "counters", target_os = "linux"))]
            if let Some(mut group) = self.counters.take() {
                let _ = group.stop();
            }
        }
    }
}
