use std::num::NonZeroU64;
use std::time::Duration;

use proptest::prelude::*;
use timed_block::{ManualClock, Measurement, PrintMode, Profiler, ProfilerConfig, Summary, Verdict};

fn quiet() -> ProfilerConfig {
    ProfilerConfig::default().print_mode(PrintMode::Disabled).counters(false)
}

fn arb_measurement() -> impl Strategy<Value = Measurement> {
    ("[a-z]{1,8}", 1u64..10_000, 0u64..10_000_000)
        .prop_map(|(title, n, nanos)| Measurement::new(title, NonZeroU64::new(n).unwrap(), Duration::from_nanos(nanos)))
}

proptest! {
    #[test]
    fn body_invoked_exactly_iterations_times(n in 1u64..5_000) {
        let mut p = Profiler::with_config(quiet());
        let mut calls = 0u64;
        for _ in p.block("count", n).unwrap() {
            calls += 1;
        }
        prop_assert_eq!(calls, n);
        let m = p.history().last().unwrap();
        prop_assert_eq!(m.iterations(), n);
        prop_assert!(m.per_iteration_us().is_finite() && m.per_iteration_us() >= 0.0);
    }

    #[test]
    fn manual_clock_elapsed_is_sum_of_steps(steps in prop::collection::vec(0u64..1_000, 1..200)) {
        let clock = ManualClock::default();
        let mut p = Profiler::with_clock(clock.clone(), quiet());
        let mut it = steps.iter();
        for _ in p.block("steps", steps.len() as u64).unwrap() {
            clock.advance(Duration::from_micros(*it.next().unwrap()));
        }
        let total: u64 = steps.iter().sum();
        prop_assert_eq!(p.history().last().unwrap().elapsed(), Duration::from_micros(total));
    }

    #[test]
    fn summary_sorted_ascending_with_first_as_reference(ms in prop::collection::vec(arb_measurement(), 2..30)) {
        let first = ms[0].clone();
        let s = Summary::rank(ms.clone()).unwrap();
        prop_assert_eq!(s.len(), ms.len());
        prop_assert_eq!(s.reference(), &first);
        for pair in s.entries().windows(2) {
            prop_assert!(pair[0].measurement.per_iteration_us() <= pair[1].measurement.per_iteration_us());
        }
        for (i, r) in s.entries().iter().enumerate() {
            prop_assert_eq!(r.rank, i + 1);
            prop_assert!(!r.factor.is_nan());
            match r.verdict() {
                Verdict::Reference => prop_assert_eq!(r.factor, 1.0),
                Verdict::Faster(x) => prop_assert!(x > 1.0),
                Verdict::Slower(x) => prop_assert!(x >= 1.0),
            }
        }
    }

    #[test]
    fn summarize_always_empties_history(ms in prop::collection::vec(arb_measurement(), 0..10)) {
        let mut p = Profiler::with_config(quiet());
        for m in ms.iter().cloned() {
            p.record(m).unwrap();
        }
        let summary = p.summarize();
        prop_assert_eq!(summary.is_some(), ms.len() >= 2);
        prop_assert!(p.history().is_empty());
        prop_assert!(p.summarize().is_none());
    }
}
