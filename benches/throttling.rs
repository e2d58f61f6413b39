use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use throttled_log::{
    FrameClock, Level, LogFacade, ShardedStorage, Subsystem, SubsystemThrottle, SystemClock,
    ThrottleKey, ThrottleRegistry, TimingMode, TimingPolicy, TimingUpdate,
};

/// Sink that discards everything, so benchmarks measure the pipeline only.
#[derive(Debug)]
struct NullSink;

impl throttled_log::Sink for NullSink {
    fn write_info(&self, text: &str) {
        black_box(text);
    }
    fn write_warning(&self, text: &str) {
        black_box(text);
    }
    fn write_error(&self, text: &str) {
        black_box(text);
    }
}

type Registry = ThrottleRegistry<Arc<ShardedStorage<Subsystem, SubsystemThrottle>>>;

fn registry() -> Registry {
    ThrottleRegistry::new(
        Arc::new(ShardedStorage::new()),
        Arc::new(SystemClock::new()),
        Arc::new(FrameClock::new()),
        TimingPolicy::default(),
    )
}

/// Benchmark throttle key composition
fn bench_key_composition(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_composition");

    group.bench_function("message_only", |b| {
        b.iter(|| {
            ThrottleKey::new(
                black_box(Level::Info),
                None,
                black_box("Player joined"),
                None,
            )
        })
    });

    group.bench_function("scoped_with_key", |b| {
        b.iter(|| {
            ThrottleKey::new(
                black_box(Level::Warning),
                Some(black_box("Socket")),
                black_box("peer 10.0.0.1 timed out"),
                Some(black_box("peer-timeout")),
            )
        })
    });

    group.finish();
}

/// Benchmark single-threaded throttle decisions in both timing modes
fn bench_single_threaded_decisions(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_threaded");

    for mode in [TimingMode::WallClock, TimingMode::Frame] {
        group.throughput(Throughput::Elements(1000));

        group.bench_with_input(
            BenchmarkId::new("should_log", format!("{:?}", mode)),
            &mode,
            |b, &mode| {
                let registry = registry();
                let net = Subsystem::new("Net").unwrap();
                registry.configure(&net, TimingUpdate::new().mode(mode));

                b.iter(|| {
                    for _ in 0..1000 {
                        black_box(registry.should_log(
                            &net,
                            Level::Info,
                            None,
                            black_box("ping"),
                            None,
                        ));
                    }
                })
            },
        );
    }

    group.finish();
}

/// Benchmark multi-threaded decisions, one subsystem per thread
fn bench_concurrent_decisions(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent");

    for num_threads in [2, 4, 8] {
        group.throughput(Throughput::Elements(num_threads as u64 * 1000));

        group.bench_with_input(
            BenchmarkId::new("threads", num_threads),
            &num_threads,
            |b, &num_threads| {
                b.iter(|| {
                    let registry = registry();

                    let handles: Vec<_> = (0..num_threads)
                        .map(|i| {
                            let registry = registry.clone();
                            std::thread::spawn(move || {
                                let subsystem = Subsystem::new(format!("Mod{}", i)).unwrap();
                                for _ in 0..1000 {
                                    black_box(registry.should_log(
                                        &subsystem,
                                        Level::Info,
                                        None,
                                        "tick",
                                        None,
                                    ));
                                }
                            })
                        })
                        .collect();

                    for handle in handles {
                        handle.join().unwrap();
                    }
                })
            },
        );
    }

    group.finish();
}

/// Benchmark the full facade path for suppressed, filtered and written calls
fn bench_facade_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("facade");
    group.throughput(Throughput::Elements(1000));

    let facade = Arc::new(
        LogFacade::builder()
            .with_sink(Arc::new(NullSink))
            .with_frame_clock(Arc::new(FrameClock::new()))
            .build(),
    );
    let log = facade.logger("Net").unwrap();

    group.bench_function("throttled_suppressed", |b| {
        b.iter(|| {
            for _ in 0..1000 {
                log.warning_throttled(black_box("packet dropped"), None);
            }
        })
    });

    group.bench_function("filtered", |b| {
        b.iter(|| {
            for _ in 0..1000 {
                log.debug(black_box("noisy detail"));
            }
        })
    });

    group.bench_function("written", |b| {
        b.iter(|| {
            for _ in 0..1000 {
                log.scoped("Socket").info(black_box("bytes received"));
            }
        })
    });

    group.finish();
}

/// Benchmark decision cost as a subsystem tracks more keys
fn bench_key_cardinality(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_cardinality");

    for num_keys in [100, 1_000, 10_000] {
        group.bench_with_input(
            BenchmarkId::new("insert", num_keys),
            &num_keys,
            |b, &num_keys| {
                let messages: Vec<String> =
                    (0..num_keys).map(|i| format!("entity {} moved", i)).collect();

                b.iter(|| {
                    let registry = registry();
                    let world = Subsystem::new("World").unwrap();
                    for message in &messages {
                        black_box(registry.should_log(&world, Level::Trace, None, message, None));
                    }
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_key_composition,
    bench_single_threaded_decisions,
    bench_concurrent_decisions,
    bench_facade_paths,
    bench_key_cardinality
);
criterion_main!(benches);
