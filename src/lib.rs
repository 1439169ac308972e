//! Time a counted block of code, print what one iteration costs, and rank
//! several blocks against the first one you measured.
//!
//! Iterator API (the loop is the measured block):
//! ```rust
//! use timed_block::*;
//!
//! let mut p = Profiler::new();
//! let mut x = 10_000f32;
//! for _ in p.block("f32::sqrt", 100_000)? {
//!     x = black_box(x.sqrt() + 13.0);
//! }
//! # Ok::<(), ProfileError>(())
//! ```
//!
//! Macro API, comparing against a reference:
//! ```rust
//! use timed_block::*;
//! use std::num::NonZeroU64;
//!
//! let mut p = Profiler::with_config(ProfilerConfig::default().default_iterations(NonZeroU64::new(10_000).unwrap()));
//! let (mut a, mut b) = (10_000f64, 10_000f64);
//! profile!(p, "f64::sqrt" => { a = black_box(a.sqrt() + 13.0); });
//! profile!(p, "f64::powf(0.5)", 10_000 => { b = black_box(b.powf(0.5) + 13.0); })?;
//! let summary = p.summarize().unwrap(); // also printed, history is now empty
//! assert_eq!(summary.reference().title(), "f64::sqrt");
//! # Ok::<(), ProfileError>(())
//! ```
//!
//! Closure API:
//! ```rust
//! use timed_block::*;
//!
//! let mut p = Profiler::new();
//! let mut acc = 0u64;
//! let m = p.measure("wrapping_mul", 1000, |i| acc = black_box(acc.wrapping_mul(31).wrapping_add(i)))?;
//! assert_eq!(m.iterations(), 1000);
//! # Ok::<(), ProfileError>(())
//! ```
//!
//! A `Profiler` is meant for one thread. Give each thread (and each test) its own.
use std::num::NonZeroU64;

mod block;
mod config;
#[cfg(all(feature = "counters", target_os = "linux"))]
mod counters;
mod error;
mod history;
mod measurement;
pub mod print;
mod summary;
mod timer;

pub use block::TimedBlock;
pub use config::{ProfilerConfig, ENV_COUNTERS, ENV_ITERATIONS, ENV_PRINT};
pub use error::{ProfileError, Result};
pub use history::{Capacity, History, Overflow, Recorded, INITIAL_SLOTS};
pub use measurement::Measurement;
pub use print::PrintMode;
pub use summary::{Ranked, Summary, Verdict};
pub use timer::{Clock, ManualClock, Monotonic};

// re-export
pub use std::hint::black_box;

/// Iterations used when a block does not name a count.
pub const DEFAULT_ITERATIONS: NonZeroU64 = match NonZeroU64::new(10_000_000) {
    Some(n) => n,
    None => unreachable!(),
};

////////////////////////////////////////////////////////////////////////////////
// Profiler

/// Owns the measurement history and the clock; hands out [`TimedBlock`]s.
pub struct Profiler<C: Clock = Monotonic> {
    pub(crate) clock: C,
    pub(crate) config: ProfilerConfig,
    pub(crate) history: History,
}

impl Default for Profiler {
    fn default() -> Self {
        Self::with_config(ProfilerConfig::default())
    }
}

impl Profiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ProfilerConfig) -> Self {
        Self::with_clock(Monotonic, config)
    }

    /// Configured from `TIMED_BLOCK_*` environment variables.
    pub fn from_env() -> Self {
        Self::with_config(ProfilerConfig::from_env())
    }
}

impl<C: Clock> Profiler<C> {
    pub fn with_clock(clock: C, config: ProfilerConfig) -> Self {
        Self {
            clock,
            history: History::new(config.capacity),
            config,
        }
    }

    /// Start a timed block of `iterations` passes. Zero is rejected.
    pub fn block(&mut self, title: impl Into<String>, iterations: u64) -> Result<TimedBlock<'_, C>> {
        let title = title.into();
        match NonZeroU64::new(iterations) {
            Some(n) => Ok(TimedBlock::start(self, title, n)),
            None => Err(ProfileError::InvalidIterationCount { title }),
        }
    }

    /// Start a timed block with the configured default iteration count.
    pub fn block_default(&mut self, title: impl Into<String>) -> TimedBlock<'_, C> {
        let n = self.config.default_iterations;
        TimedBlock::start(self, title.into(), n)
    }

    /// Run `body` `iterations` times as one timed block, passing the iteration index.
    ///
    /// Returns a copy of the measurement as it now sits in the history. A full
    /// bounded history that discards it yields [`ProfileError::NotRecorded`],
    /// which still carries the measurement.
    pub fn measure<F: FnMut(u64)>(&mut self, title: impl Into<String>, iterations: u64, mut body: F) -> Result<Measurement> {
        let mut block = self.block(title, iterations)?;
        for i in block.by_ref() {
            body(i);
        }
        match block.take_result() {
            Some(res) => res,
            None => unreachable!("a drained block is finished"),
        }
    }

    /// Add an externally taken measurement to the history.
    pub fn record(&mut self, measurement: Measurement) -> Result<Recorded> {
        self.history.record(measurement)
    }

    /// Rank everything recorded since the last summary against the first
    /// entry, print the ranking, and empty the history.
    ///
    /// Returns `None` (and prints nothing) when fewer than two measurements
    /// were recorded; the history is cleared either way.
    pub fn summarize(&mut self) -> Option<Summary> {
        let taken = self.history.take();
        log::debug!("summarizing {} measurements", taken.len());
        let summary = Summary::rank(taken)?;
        if self.config.print_mode != PrintMode::Disabled {
            println!("\n{}", summary);
        }
        Some(summary)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Drop all recorded measurements without reporting them.
    pub fn reset(&mut self) {
        self.history.clear();
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

/// Time a block of code.
///
/// `profile!(p, "title" => { .. })` runs the body the configured default
/// number of times. `profile!(p, "title", n => { .. })` runs it `n` times and
/// evaluates to `Result<(), ProfileError>`, which fails for `n == 0`.
#[macro_export]
macro_rules! profile {
    ($profiler:expr, $title:expr => $body:block) => {
        for _ in $profiler.block_default($title) $body
    };
    ($profiler:expr, $title:expr, $iterations:expr => $body:block) => {
        match $profiler.block($title, $iterations) {
            ::core::result::Result::Ok(block) => {
                for _ in block $body
                ::core::result::Result::<(), $crate::ProfileError>::Ok(())
            }
            ::core::result::Result::Err(e) => ::core::result::Result::Err(e),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn quiet() -> ProfilerConfig {
        ProfilerConfig::default().print_mode(PrintMode::Disabled).counters(false)
    }

    fn us(n: u64) -> Duration {
        Duration::from_micros(n)
    }

    fn m(title: &str, elapsed: Duration, iterations: u64) -> Measurement {
        Measurement::new(title, NonZeroU64::new(iterations).unwrap(), elapsed)
    }

    #[test]
    fn summarize_ranks_against_first_recorded() {
        let mut p = Profiler::with_config(quiet());
        p.record(m("A", us(100), 10)).unwrap();
        p.record(m("B", us(40), 10)).unwrap();
        p.record(m("C", us(200), 10)).unwrap();
        let s = p.summarize().unwrap();
        assert_eq!(s.reference().title(), "A");
        let verdicts: Vec<_> = s.entries().iter().map(|r| (r.measurement.title(), r.verdict())).collect();
        assert!(matches!(verdicts[0], ("B", Verdict::Faster(_))));
        assert_eq!(verdicts[1], ("A", Verdict::Reference));
        assert!(matches!(verdicts[2], ("C", Verdict::Slower(_))));
        assert!(p.history().is_empty());
    }

    #[test]
    fn summarize_single_still_clears() {
        let mut p = Profiler::with_config(quiet());
        p.record(m("alone", us(1), 1)).unwrap();
        assert!(p.summarize().is_none());
        assert!(p.history().is_empty());
        assert!(p.summarize().is_none());
    }

    #[test]
    fn cycles_do_not_leak_state() {
        let clock = ManualClock::default();
        let mut p = Profiler::with_clock(clock.clone(), quiet());
        let run = |p: &mut Profiler<ManualClock>| {
            for (title, step) in [("slow", 4), ("fast", 1)] {
                for _ in p.block(title, 5).unwrap() {
                    clock.advance(us(step));
                }
            }
            p.summarize().unwrap()
        };
        let first = run(&mut p);
        let second = run(&mut p);
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
        assert_eq!(second.reference().title(), "slow");
        assert_eq!(second.entries()[0].verdict(), Verdict::Faster(4.0));
    }

    #[test]
    fn block_default_uses_configured_count() {
        let mut p = Profiler::with_config(quiet().default_iterations(NonZeroU64::new(7).unwrap()));
        let mut n = 0;
        for _ in p.block_default("seven") {
            n += 1;
        }
        assert_eq!(n, 7);
        assert_eq!(p.history().last().unwrap().iterations(), 7);
    }

    #[test]
    fn measure_returns_recorded_copy() {
        let mut p = Profiler::with_config(quiet());
        let mut calls = Vec::new();
        let got = p.measure("closure", 3, |i| calls.push(i)).unwrap();
        assert_eq!(calls, [0, 1, 2]);
        assert_eq!(&got, p.history().last().unwrap());
    }

    #[test]
    fn measure_rejects_zero() {
        let mut p = Profiler::with_config(quiet());
        let mut called = false;
        assert!(p.measure("zero", 0, |_| called = true).is_err());
        assert!(!called);
    }

    #[test]
    fn macro_forms() {
        let mut p = Profiler::with_config(quiet().default_iterations(NonZeroU64::new(3).unwrap()));
        let mut hits = 0;
        profile!(p, "default" => { hits += 1; });
        profile!(p, "counted", 4 => { hits += 1; }).unwrap();
        assert!(profile!(p, "zero", 0 => { hits += 1; }).is_err());
        assert_eq!(hits, 7);
        let titles: Vec<_> = p.history().iter().map(Measurement::title).collect();
        assert_eq!(titles, ["default", "counted"]);
    }

    #[test]
    fn reset_discards_without_summary() {
        let mut p = Profiler::with_config(quiet());
        p.record(m("a", us(1), 1)).unwrap();
        p.record(m("b", us(1), 1)).unwrap();
        p.reset();
        assert!(p.summarize().is_none());
    }

    #[test]
    fn printing_enabled_does_not_disturb_results() {
        let mut p = Profiler::with_config(ProfilerConfig::default().counters(false));
        p.measure("printed", 10, |i| {
            black_box(i);
        })
        .unwrap();
        p.record(m("other", us(5), 1)).unwrap();
        assert_eq!(p.summarize().unwrap().len(), 2);
    }
}
