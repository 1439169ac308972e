use std::num::NonZeroU64;
use std::time::Duration;

/// One finished timed block. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    title: String,
    iterations: NonZeroU64,
    elapsed: Duration,
    counters: Vec<(String, f64)>, // per-iteration values
}

impl Measurement {
    pub fn new(title: impl Into<String>, iterations: NonZeroU64, elapsed: Duration) -> Self {
        Self {
            title: title.into(),
            iterations,
            elapsed,
            counters: Vec::new(),
        }
    }

    /// Attach hardware counter readings, already divided by the iteration count.
    pub fn with_counters(mut self, counters: Vec<(String, f64)>) -> Self {
        self.counters = counters;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn iterations(&self) -> u64 {
        self.iterations.get()
    }

    /// Total time for all iterations.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_us(&self) -> f64 {
        self.elapsed.as_nanos() as f64 / 1e3
    }

    /// Time of a single iteration, in microseconds.
    pub fn per_iteration_us(&self) -> f64 {
        self.elapsed_us() / self.iterations.get() as f64
    }

    /// Time of a single iteration, truncated to whole nanoseconds.
    pub fn per_iteration(&self) -> Duration {
        let nanos = self.elapsed.as_nanos() / u128::from(self.iterations.get());
        Duration::from_nanos(nanos as u64)
    }

    pub fn counters(&self) -> &[(String, f64)] {
        &self.counters
    }

    /// Counter value by name
    pub fn counter(&self, name: &str) -> Option<f64> {
        self.counters.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }
}
