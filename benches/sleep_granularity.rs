use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;
use unsafe_native::{SleepStrategy, SystemInterface};

fn sleep_granularity(c: &mut Criterion) {
    let mut group = c.benchmark_group("sleep_granularity");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(5));

    for strategy in [SleepStrategy::Select, SleepStrategy::Nanosleep] {
        let sys = SystemInterface::with_strategy(strategy);
        for millis in [1, 5, 10] {
            group.bench_with_input(BenchmarkId::new(strategy.to_string(), millis), &millis, |b, &ms| {
                b.iter(|| sys.sleep_millis(ms))
            });
        }
    }

    group.finish();
}

criterion_group!(benches, sleep_granularity);
criterion_main!(benches);
