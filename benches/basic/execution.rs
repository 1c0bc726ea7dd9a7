//! Eager execution benchmarks

use criterion::{BatchSize, BenchmarkId, Criterion};
use lazydag::Scheduler;
use std::hint::black_box;

fn independent(width: usize) -> Scheduler<'static> {
    let scheduler = Scheduler::new();
    for i in 0..width {
        scheduler.add(move || i * 2, ()).unwrap();
    }
    scheduler
}

fn chain(depth: usize) -> Scheduler<'static> {
    let scheduler = Scheduler::new();
    let mut prev = scheduler.add(|| 0_u64, ()).unwrap();
    for _ in 0..depth {
        prev = scheduler
            .add(|x: u64| x + 1, (scheduler.future_result::<u64>(prev),))
            .unwrap();
    }
    scheduler
}

pub fn bench_execute_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("execute_all_independent");
    for width in [100, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, &width| {
            b.iter_batched(
                || independent(width),
                |scheduler| {
                    scheduler.execute_all().unwrap();
                    black_box(scheduler)
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();

    let mut group = c.benchmark_group("execute_all_chain");
    for depth in [100, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter_batched(
                || chain(depth),
                |scheduler| {
                    scheduler.execute_all().unwrap();
                    black_box(scheduler)
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}
