//! Diamond benchmark: stacked split-and-join layers

use criterion::{BatchSize, Criterion};
use lazydag::Scheduler;
use std::hint::black_box;

pub fn bench_diamond(c: &mut Criterion) {
    c.bench_function("diamond_stack_100", |b| {
        b.iter_batched(
            || {
                let scheduler = Scheduler::new();
                let mut top = scheduler.add(|| 1_i64, ()).unwrap();
                for _ in 0..100 {
                    let left = scheduler
                        .add(|x: i64| x + 1, (scheduler.future_result::<i64>(top),))
                        .unwrap();
                    let right = scheduler
                        .add(|x: i64| x - 1, (scheduler.future_result::<i64>(top),))
                        .unwrap();
                    top = scheduler
                        .add(
                            |a: i64, b: i64| (a + b) / 2,
                            (
                                scheduler.future_result::<i64>(left),
                                scheduler.future_result::<i64>(right),
                            ),
                        )
                        .unwrap();
                }
                (scheduler, top)
            },
            |(scheduler, top)| {
                scheduler.execute_all().unwrap();
                black_box(scheduler.get_result::<i64>(top).unwrap())
            },
            BatchSize::SmallInput,
        );
    });
}
