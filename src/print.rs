use std::fmt::Write;

use crate::Measurement;

/// How a finished block reports itself on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintMode {
    Regular(bool), // header
    Transposed,
    Disabled,
}
impl Default for PrintMode {
    fn default() -> Self {
        PrintMode::Transposed
    }
}

impl From<bool> for PrintMode {
    fn from(value: bool) -> Self {
        PrintMode::Regular(value)
    }
}

pub trait ColumnWriter {
    fn write_str(&mut self, name: &str, val: &str);

    fn write_u64(&mut self, name: &str, val: u64) {
        self.write_str(name, val.to_string().as_str());
    }
    fn write_f64(&mut self, name: &str, val: f64, decimals: usize) {
        self.write_str(name, &format!("{:.decimals$}", val));
    }
}

impl ColumnWriter for (&mut String, &mut String) {
    fn write_str(&mut self, name: &str, val: &str) {
        let width = std::cmp::max(name.len(), val.len());
        let _ = write!(self.0, "{:>width$}, ", name);
        let _ = write!(self.1, "{:>width$}, ", val);
    }
}

pub(crate) struct TransposedWriter<'a>(pub(crate) usize, pub(crate) &'a mut String);
impl<'a> ColumnWriter for &mut TransposedWriter<'a> {
    fn write_str(&mut self, name: &str, val: &str) {
        let width = self.0 + 1;
        let _ = write!(self.1, "    {:<width$}", name);
        let _ = writeln!(self.1, ": {}", val);
    }
}

const COLUMNS: [&str; 5] = ["iterations", "total_us", "total_sec", "iter_us", "iter_sec"];

/// Append a measurement's figures (and per-iteration counters) as columns.
pub fn write_measurement(m: &Measurement, mut cols: impl ColumnWriter) {
    let total_us = m.elapsed_us();
    let iter_us = m.per_iteration_us();
    cols.write_u64(COLUMNS[0], m.iterations());
    cols.write_f64(COLUMNS[1], total_us, 3);
    cols.write_f64(COLUMNS[2], total_us / 1e6, 6);
    cols.write_f64(COLUMNS[3], iter_us, 6);
    cols.write_f64(COLUMNS[4], iter_us / 1e6, 9);
    for (name, val) in m.counters() {
        cols.write_f64(name, *val, 2);
    }
}

/// Render the per-block report, or `None` when printing is disabled.
pub fn render(m: &Measurement, mode: PrintMode) -> Option<String> {
    match mode {
        PrintMode::Regular(header) => {
            let mut hdr = String::new();
            let mut dat = String::new();
            (&mut hdr, &mut dat).write_str("title", m.title());
            write_measurement(m, (&mut hdr, &mut dat));
            let mut out = String::new();
            if header {
                let _ = writeln!(out, "{}", hdr.trim_end());
            }
            let _ = write!(out, "{}", dat.trim_end());
            Some(out)
        }
        PrintMode::Transposed => {
            let maxlen = COLUMNS
                .iter()
                .copied()
                .chain(m.counters().iter().map(|(n, _)| n.as_str()))
                .fold(0, |acc, item| acc.max(item.len()));
            let mut output = format!("{}:\n", m.title());
            let mut wr = TransposedWriter(maxlen, &mut output);
            write_measurement(m, &mut wr);
            Some(output)
        }
        PrintMode::Disabled => None,
    }
}

pub fn print(m: &Measurement, mode: PrintMode) {
    if let Some(report) = render(m, mode) {
        println!("{}", report);
    }
}
