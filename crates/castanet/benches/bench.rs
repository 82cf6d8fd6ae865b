use castanet::{
    AtomicSequence, FixedClock, FixedContext, Identifier, IdentifierFactory, LogFormatter,
    MemoryTransport, SequenceSource, Tracker, UidConfig, decode_cookie, encode_cookie, format,
};
use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

// Number of operations per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_IDS: usize = 4096;

const NOW: FixedClock = FixedClock::from_secs_micros(1_700_000_000, 123_456);

fn context() -> FixedContext {
    FixedContext {
        local_address: Some(0x7F00_0001),
        request_time: Some(1_700_000_000),
        process_id: 4242,
    }
}

fn sample_ids() -> Vec<Identifier> {
    let factory = IdentifierFactory::new(AtomicSequence::new(), context(), NOW);
    (0..TOTAL_IDS)
        .map(|_| factory.create_fresh(None, None))
        .collect()
}

/// Benchmarks a counter drawn from a single thread.
fn bench_sequence<S>(c: &mut Criterion, group_name: &str, sequence_factory: impl Fn() -> S)
where
    S: SequenceSource,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{}", TOTAL_IDS), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let sequence = sequence_factory();
                for _ in 0..TOTAL_IDS {
                    black_box(sequence.next_sequence());
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks a counter shared across threads.
fn bench_sequence_contended<S>(c: &mut Criterion, group_name: &str, sequence_fn: impl Fn() -> S)
where
    S: SequenceSource + Send + Sync,
{
    let mut group = c.benchmark_group(group_name);

    for thread_count in [1, 2, 4, 8, 16] {
        let ids_per_thread = TOTAL_IDS / thread_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(
            format!("elems/{}/threads/{}", TOTAL_IDS, thread_count),
            |b| {
                b.iter_custom(|iters| {
                    let start = Instant::now();

                    for _ in 0..iters {
                        let sequence = Arc::new(sequence_fn());
                        let barrier = Arc::new(Barrier::new(thread_count + 1));
                        scope(|s| {
                            for _ in 0..thread_count {
                                let sequence = Arc::clone(&sequence);
                                let barrier = Arc::clone(&barrier);
                                s.spawn(move || {
                                    barrier.wait();
                                    for _ in 0..ids_per_thread {
                                        black_box(sequence.next_sequence());
                                    }
                                });
                            }
                            barrier.wait();
                        });
                    }

                    start.elapsed()
                });
            },
        );
    }

    group.finish();
}

fn benchmark_sequential_atomic(c: &mut Criterion) {
    bench_sequence(c, "sequence/sequential/atomic", AtomicSequence::new);
}

fn benchmark_contended_atomic(c: &mut Criterion) {
    bench_sequence_contended(c, "sequence/contended/atomic", AtomicSequence::new);
}

#[cfg(feature = "parking-lot")]
fn benchmark_sequential_lock(c: &mut Criterion) {
    bench_sequence(c, "sequence/sequential/lock", castanet::LockSequence::new);
}

#[cfg(feature = "parking-lot")]
fn benchmark_contended_lock(c: &mut Criterion) {
    bench_sequence_contended(c, "sequence/contended/lock", castanet::LockSequence::new);
}

#[cfg(not(feature = "parking-lot"))]
fn benchmark_sequential_lock(_: &mut Criterion) {}

#[cfg(not(feature = "parking-lot"))]
fn benchmark_contended_lock(_: &mut Criterion) {}

fn benchmark_factory_fresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("factory/fresh");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    let counter = AtomicSequence::new();
    let factory = IdentifierFactory::new(&counter, context(), NOW);
    group.bench_function(format!("elems/{}", TOTAL_IDS), |b| {
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                black_box(factory.create_fresh(None, None));
            }
        });
    });

    group.finish();
}

fn benchmark_cookie(c: &mut Criterion) {
    let ids = sample_ids();
    let cookies: Vec<_> = ids.iter().map(encode_cookie).collect();

    let mut group = c.benchmark_group("cookie");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("encode/elems/{}", TOTAL_IDS), |b| {
        b.iter(|| {
            for id in &ids {
                black_box(encode_cookie(black_box(id)));
            }
        });
    });

    group.bench_function(format!("decode/elems/{}", TOTAL_IDS), |b| {
        b.iter(|| {
            for cookie in &cookies {
                black_box(decode_cookie(black_box(cookie)).ok());
            }
        });
    });

    group.finish();
}

fn benchmark_log(c: &mut Criterion) {
    let ids = sample_ids();
    let raw = LogFormatter::raw();
    let values: Vec<_> = ids.iter().map(|id| raw.format(id)).collect();

    let mut group = c.benchmark_group("log");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("format/elems/{}", TOTAL_IDS), |b| {
        b.iter(|| {
            for id in &ids {
                black_box(format(black_box(id)));
            }
        });
    });

    group.bench_function(format!("parse/elems/{}", TOTAL_IDS), |b| {
        b.iter(|| {
            for value in &values {
                black_box(raw.parse(black_box(value)).ok());
            }
        });
    });

    group.finish();
}

fn benchmark_tracker(c: &mut Criterion) {
    let counter = AtomicSequence::new();
    let tracker = Tracker::new(
        IdentifierFactory::new(&counter, context(), NOW),
        UidConfig::default(),
    )
    .enable();
    let presented = encode_cookie(&sample_ids()[0]);

    let mut group = c.benchmark_group("tracker");
    group.throughput(Throughput::Elements(1));

    group.bench_function("set", |b| {
        b.iter(|| {
            let mut transport = MemoryTransport::new();
            black_box(tracker.start(&mut transport, None).ok());
        });
    });

    group.bench_function("got", |b| {
        b.iter(|| {
            let mut transport = MemoryTransport::new().with_cookie("uid", presented.as_str());
            black_box(tracker.start(&mut transport, None).ok());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_sequential_atomic,
    benchmark_sequential_lock,
    benchmark_contended_atomic,
    benchmark_contended_lock,
    benchmark_factory_fresh,
    benchmark_cookie,
    benchmark_log,
    benchmark_tracker,
);
criterion_main!(benches);
