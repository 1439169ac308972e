use std::io;

use thiserror::Error;

use crate::Measurement;

/// Everything that can go wrong inside the profiler itself.
///
/// None of these touch the timed workload: a failing body propagates its own
/// error (or panic) unchanged.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// A block was requested with zero iterations.
    #[error("iteration count must be positive, got 0 for {title:?}")]
    InvalidIterationCount { title: String },

    /// A bounded history with [`Overflow::Fail`](crate::Overflow::Fail) is full.
    #[error("history is full ({capacity} measurements)")]
    HistoryOverflow { capacity: usize },

    /// A full bounded history with [`Overflow::DropNewest`](crate::Overflow::DropNewest)
    /// (or zero slots) discarded a finished block's measurement.
    #[error("history is full, {:?} was not kept", .measurement.title())]
    NotRecorded { measurement: Box<Measurement> },

    /// Opening, starting or stopping hardware counters failed.
    #[error("hardware counters: {0}")]
    Counters(#[from] io::Error),

    /// A configuration value could not be parsed.
    #[error("invalid value {value:?} for {key}")]
    InvalidConfig { key: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ProfileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let e = ProfileError::InvalidIterationCount { title: "loop".into() };
        assert_eq!(e.to_string(), "iteration count must be positive, got 0 for \"loop\"");
        let e: ProfileError = io::Error::new(io::ErrorKind::PermissionDenied, "perf_event_paranoid").into();
        assert!(e.to_string().starts_with("hardware counters: "));
        assert_eq!(ProfileError::HistoryOverflow { capacity: 20 }.to_string(), "history is full (20 measurements)");
        let kept = Measurement::new("late", std::num::NonZeroU64::MIN, std::time::Duration::ZERO);
        let e = ProfileError::NotRecorded { measurement: Box::new(kept) };
        assert_eq!(e.to_string(), "history is full, \"late\" was not kept");
    }
}
