use std::fmt;

use crate::Measurement;

/// How a measurement compares to the reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Reference,
    /// This many times faster than the reference.
    Faster(f64),
    /// This many times slower than the reference.
    Slower(f64),
}

/// One line of a [`Summary`].
#[derive(Debug, Clone)]
pub struct Ranked {
    /// 1-based position after sorting by per-iteration time.
    pub rank: usize,
    pub measurement: Measurement,
    /// Reference per-iteration time divided by this one's.
    pub factor: f64,
}

impl Ranked {
    pub fn verdict(&self) -> Verdict {
        if self.factor == 1.0 {
            Verdict::Reference
        } else if self.factor > 1.0 {
            Verdict::Faster(self.factor)
        } else {
            Verdict::Slower(1.0 / self.factor)
        }
    }

    /// `factor` as a whole percentage.
    pub fn percent(&self) -> f64 {
        (self.factor * 100.0).round()
    }
}

/// Measurements ranked fastest-first against the first one recorded.
#[derive(Debug, Clone)]
pub struct Summary {
    reference: Measurement,
    ranked: Vec<Ranked>,
}

fn factor(base: f64, per_iteration: f64) -> f64 {
    match (base == 0.0, per_iteration == 0.0) {
        (true, true) => 1.0,
        (false, true) => f64::INFINITY,
        _ => base / per_iteration,
    }
}

impl Summary {
    /// Rank `measurements` (in recording order). Returns `None` for fewer than two,
    /// since there is nothing to compare.
    pub fn rank(mut measurements: Vec<Measurement>) -> Option<Self> {
        if measurements.len() < 2 {
            return None;
        }
        let reference = measurements[0].clone();
        let base = reference.per_iteration_us();

        measurements.sort_unstable_by(|a, b| a.per_iteration_us().total_cmp(&b.per_iteration_us()));

        let ranked = measurements
            .into_iter()
            .enumerate()
            .map(|(i, measurement)| Ranked {
                rank: i + 1,
                factor: factor(base, measurement.per_iteration_us()),
                measurement,
            })
            .collect();
        Some(Self { reference, ranked })
    }

    pub fn reference(&self) -> &Measurement {
        &self.reference
    }

    pub fn entries(&self) -> &[Ranked] {
        &self.ranked
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PROFILER SUMMARY:")?;
        for r in &self.ranked {
            write!(f, "  - {}: [{:3.0}%] {:?} ", r.rank, r.factor * 100.0, r.measurement.title())?;
            match r.verdict() {
                Verdict::Reference => writeln!(f, "is the reference.")?,
                Verdict::Faster(x) => writeln!(f, "is {:.3} times faster.", x)?,
                Verdict::Slower(x) => writeln!(f, "is {:.3} times slower.", x)?,
            }
        }
        Ok(())
    }
}
