use std::num::NonZeroU64;

use timed_block::{black_box, Capacity, Overflow, PrintMode, Profiler, ProfilerConfig};

fn main() -> timed_block::Result<()> {
    env_logger::init();
    let config = ProfilerConfig::default()
        .default_iterations(NonZeroU64::new(1_000_000).unwrap())
        .print_mode(PrintMode::Regular(true))
        .capacity(Capacity::Bounded { slots: 20, overflow: Overflow::Fail });
    let mut p = Profiler::with_config(config);

    let data: Vec<u64> = (0..1024).collect();
    for (title, stride) in [("stride 1", 1usize), ("stride 8", 8), ("stride 64", 64)] {
        let mut acc = 0u64;
        p.measure(title, 100_000, |i| {
            let idx = (i as usize * stride) % data.len();
            acc = black_box(acc.wrapping_add(data[idx]));
        })?;
    }

    let mut acc = 0u64;
    for i in p.block_default("wrapping_mul") {
        acc = black_box(acc.wrapping_mul(31).wrapping_add(i));
    }

    if let Some(summary) = p.summarize() {
        let fastest = &summary.entries()[0];
        println!("fastest: {} ({:.4} us/iter)", fastest.measurement.title(), fastest.measurement.per_iteration_us());
    }
    Ok(())
}
