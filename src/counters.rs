//! Linux perf_event counters read around a timed block.
use std::io;

use perfcnt::linux::{
    CacheId, CacheOpId, CacheOpResultId, FileReadFormat, HardwareEventType, PerfCounter, PerfCounterBuilderLinux as Builder,
    SoftwareEventType,
};
use perfcnt::AbstractPerfCounter;

use crate::ProfileError;

fn default_events() -> Vec<(&'static str, Builder)> {
    vec![
        ("cycles", Builder::from_hardware_event(HardwareEventType::CPUCycles)),
        ("instructions", Builder::from_hardware_event(HardwareEventType::Instructions)),
        ("L1-misses", Builder::from_cache_event(CacheId::L1D, CacheOpId::Read, CacheOpResultId::Miss)),
        ("LLC-misses", Builder::from_hardware_event(HardwareEventType::CacheMisses)),
        ("branch-misses", Builder::from_hardware_event(HardwareEventType::BranchMisses)),
        ("task-clock", Builder::from_software_event(SoftwareEventType::TaskClock)),
    ]
}

struct CounterState {
    counter: PerfCounter,
    start: FileReadFormat,
    end: FileReadFormat,
}

impl CounterState {
    fn start(&mut self) -> io::Result<()> {
        self.counter.reset()?;
        self.counter.start()?;
        self.start = self.counter.read_fd()?;
        Ok(())
    }

    fn stop(&mut self) -> io::Result<()> {
        self.end = self.counter.read_fd()?;
        self.counter.stop()?;
        Ok(())
    }

    /// Counter delta, corrected for multiplexing.
    fn read(&self) -> f64 {
        let running = self.end.time_running - self.start.time_running;
        if running == 0 {
            return 0.0;
        }
        let correction = ((self.end.time_enabled - self.start.time_enabled) as f64) / (running as f64);
        ((self.end.value - self.start.value) as f64) * correction
    }

    fn empty_read_format() -> FileReadFormat {
        FileReadFormat {
            value: 0,
            time_enabled: 0,
            time_running: 0,
            id: 0,
        }
    }
}

impl From<PerfCounter> for CounterState {
    fn from(counter: PerfCounter) -> Self {
        CounterState {
            counter,
            start: Self::empty_read_format(),
            end: Self::empty_read_format(),
        }
    }
}

/// The counter set attached to one timed block.
pub(crate) struct CounterGroup {
    ctrs: Vec<CounterState>, // in the same order as `names`
    names: Vec<&'static str>,
}

impl CounterGroup {
    pub(crate) fn open() -> io::Result<Self> {
        let events = default_events();
        let mut ctrs = Vec::with_capacity(events.len());
        let mut names = Vec::with_capacity(events.len());
        for (name, mut builder) in events {
            ctrs.push(Self::finalize_builder(&mut builder)?);
            names.push(name);
        }
        Ok(Self { ctrs, names })
    }

    /// Open the default counters, or log why not and carry on without them.
    pub(crate) fn open_or_none() -> Option<Self> {
        match Self::open() {
            Ok(group) => Some(group),
            Err(err) => {
                log::warn!("{} (continuing without counters)", ProfileError::from(err));
                None
            }
        }
    }

    pub(crate) fn start(&mut self) -> io::Result<()> {
        let mut res: Vec<io::Error> = self.ctrs.iter_mut().map(|c| c.start()).filter_map(|c| c.err()).collect();
        match res.pop() {
            Some(err) => {
                self.ctrs.iter_mut().for_each(|c| {
                    let _ = c.stop();
                });
                Err(err)
            }
            None => Ok(()),
        }
    }

    pub(crate) fn stop(&mut self) -> io::Result<()> {
        let mut res: Vec<io::Error> = self.ctrs.iter_mut().map(|c| c.stop()).filter_map(|c| c.err()).collect();
        match res.pop() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Readings per iteration, plus IPC when both inputs are present.
    pub(crate) fn readings(&self, iterations: u64) -> Vec<(String, f64)> {
        let mut out: Vec<(String, f64)> = self
            .names
            .iter()
            .zip(&self.ctrs)
            .map(|(name, c)| ((*name).to_owned(), c.read() / iterations as f64))
            .collect();
        let get = |n: &str| out.iter().find(|(k, _)| k == n).map(|(_, v)| *v);
        if let (Some(instr), Some(cycles)) = (get("instructions"), get("cycles")) {
            if cycles > 0.0 {
                out.push(("IPC".to_owned(), instr / cycles));
            }
        }
        out
    }

    fn finalize_builder(b: &mut Builder) -> io::Result<CounterState> {
        let built = b
            .on_cpu(-1) // all cpus
            .for_pid(0) // calling process
            .inherit()
            .disable() // start disabled
            .enable_read_format_time_enabled() // multiplexing counters
            .enable_read_format_time_running()
            .enable_read_format_id()
            .finish()?;
        Ok(built.into())
    }
}
