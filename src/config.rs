use std::num::NonZeroU64;

use crate::error::{ProfileError, Result};
use crate::{Capacity, PrintMode, DEFAULT_ITERATIONS};

pub const ENV_ITERATIONS: &str = "TIMED_BLOCK_ITERATIONS";
pub const ENV_PRINT: &str = "TIMED_BLOCK_PRINT";
pub const ENV_COUNTERS: &str = "TIMED_BLOCK_COUNTERS";

/// Settings for a [`Profiler`](crate::Profiler).
#[derive(Debug, Clone)]
pub struct ProfilerConfig {
    pub(crate) default_iterations: NonZeroU64,
    pub(crate) print_mode: PrintMode,
    pub(crate) capacity: Capacity,
    pub(crate) counters: bool,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            default_iterations: DEFAULT_ITERATIONS,
            print_mode: PrintMode::default(),
            capacity: Capacity::default(),
            counters: cfg!(feature = "counters"),
        }
    }
}

impl ProfilerConfig {
    /// Iteration count used by [`Profiler::block_default`](crate::Profiler::block_default).
    pub fn default_iterations(mut self, n: NonZeroU64) -> Self {
        self.default_iterations = n;
        self
    }

    pub fn print_mode(mut self, mode: impl Into<PrintMode>) -> Self {
        self.print_mode = mode.into();
        self
    }

    pub fn capacity(mut self, capacity: Capacity) -> Self {
        self.capacity = capacity;
        self
    }

    /// Collect hardware counters. Has no effect without the `counters` feature on Linux.
    pub fn counters(mut self, on: bool) -> Self {
        self.counters = on;
        self
    }

    /// Defaults, overridden by `TIMED_BLOCK_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading values through `lookup`.
    /// Unparseable values are logged and skipped.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(v) = lookup(ENV_ITERATIONS) {
            match parse_iterations(&v) {
                Ok(n) => cfg.default_iterations = n,
                Err(e) => log::warn!("ignoring {}", e),
            }
        }
        if let Some(v) = lookup(ENV_PRINT) {
            match parse_print_mode(&v) {
                Ok(mode) => cfg.print_mode = mode,
                Err(e) => log::warn!("ignoring {}", e),
            }
        }
        if let Some(v) = lookup(ENV_COUNTERS) {
            match v.trim() {
                "1" | "true" | "on" => cfg.counters = true,
                "0" | "false" | "off" => cfg.counters = false,
                _ => log::warn!("ignoring {}", ProfileError::InvalidConfig { key: ENV_COUNTERS, value: v }),
            }
        }
        cfg
    }
}

fn parse_iterations(v: &str) -> Result<NonZeroU64> {
    v.trim()
        .replace('_', "")
        .parse::<NonZeroU64>()
        .map_err(|_| ProfileError::InvalidConfig { key: ENV_ITERATIONS, value: v.to_owned() })
}

fn parse_print_mode(v: &str) -> Result<PrintMode> {
    match v.trim().to_ascii_lowercase().as_str() {
        "regular" | "csv" => Ok(PrintMode::Regular(true)),
        "regular-noheader" | "csv-noheader" => Ok(PrintMode::Regular(false)),
        "transposed" => Ok(PrintMode::Transposed),
        "off" | "disabled" | "none" => Ok(PrintMode::Disabled),
        _ => Err(ProfileError::InvalidConfig { key: ENV_PRINT, value: v.to_owned() }),
    }
}
