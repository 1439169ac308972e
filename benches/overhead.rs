use criterion::{black_box, criterion_group, criterion_main, Criterion};
use timed_block::{PrintMode, Profiler, ProfilerConfig};

fn quiet() -> ProfilerConfig {
    ProfilerConfig::default().print_mode(PrintMode::Disabled).counters(false)
}

// Cost of the loop driver per iteration, against a bare range loop.
fn loop_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("loop_overhead");
    group.bench_function("range_1k", |b| {
        b.iter(|| {
            for i in 0..1000u64 {
                black_box(i);
            }
        })
    });
    group.bench_function("timed_block_1k", |b| {
        let mut p = Profiler::with_config(quiet());
        b.iter(|| {
            for i in p.block("bench", 1000).unwrap() {
                black_box(i);
            }
            p.reset();
        })
    });
    group.finish();
}

fn summarize(c: &mut Criterion) {
    c.bench_function("summarize_20", |b| {
        let mut p = Profiler::with_config(quiet());
        b.iter(|| {
            for n in 1..=20u64 {
                for i in p.block(format!("block {n}"), n).unwrap() {
                    black_box(i);
                }
            }
            black_box(p.summarize())
        })
    });
}

criterion_group!(benches, loop_overhead, summarize);
criterion_main!(benches);
