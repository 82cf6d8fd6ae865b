#[cfg(feature = "parking-lot")]
use crate::LockSequence;
use crate::{AtomicSequence, SEQUENCE_BASELINE, SEQUENCE_STRIDE, SequenceSource};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::thread::scope;

fn run_first_values_start_at_baseline<S: SequenceSource>(counter: S) {
    counter.reset();
    let values: Vec<u32> = (0..10).map(|_| counter.next_sequence()).collect();

    assert_eq!(values[0], 0x0303_0302);
    assert_eq!(values[1], 0x0303_0402);
    assert_eq!(values[9], 0x0303_0302 + 9 * 0x100);
    assert!(values.windows(2).all(|w| w[0] < w[1]));
}

fn run_reset_restarts_at_baseline<S: SequenceSource>(counter: S) {
    for _ in 0..5 {
        counter.next_sequence();
    }
    assert_eq!(counter.current(), SEQUENCE_BASELINE + 5 * SEQUENCE_STRIDE);

    counter.reset();
    assert_eq!(counter.current(), SEQUENCE_BASELINE);
    assert_eq!(counter.next_sequence(), SEQUENCE_BASELINE);
}

fn run_clamps_values_below_baseline<S: SequenceSource>(counter: S) {
    for below in [0, 1, 0x100, SEQUENCE_BASELINE - 1] {
        counter.set(below);
        assert_eq!(counter.next_sequence(), SEQUENCE_BASELINE);
        assert_eq!(counter.next_sequence(), SEQUENCE_BASELINE + SEQUENCE_STRIDE);
    }
}

fn run_wraparound_restarts_at_baseline<S: SequenceSource>(counter: S) {
    let last = u32::MAX - 0xFF;
    counter.set(last);

    assert_eq!(counter.next_sequence(), last);
    assert_eq!(counter.next_sequence(), SEQUENCE_BASELINE);
}

fn run_values_above_baseline_are_kept<S: SequenceSource>(counter: S) {
    counter.set(0x7000_0000);
    assert_eq!(counter.next_sequence(), 0x7000_0000);
    assert_eq!(counter.current(), 0x7000_0100);
}

fn run_distinct_values_threaded<S>(counter: S)
where
    S: SequenceSource + Send + Sync,
{
    let threads = num_cpus::get().clamp(2, 8);
    const PER_THREAD: usize = 4096;
    let total = threads * PER_THREAD;

    let counter = Arc::new(counter);
    let seen = Arc::new(Mutex::new(HashSet::with_capacity(total)));

    scope(|s| {
        for _ in 0..threads {
            let counter = Arc::clone(&counter);
            let seen = Arc::clone(&seen);
            s.spawn(move || {
                let mut local = Vec::with_capacity(PER_THREAD);
                for _ in 0..PER_THREAD {
                    local.push(counter.next_sequence());
                }
                let mut set = seen.lock().unwrap();
                for value in local {
                    assert!(value >= SEQUENCE_BASELINE);
                    assert!(set.insert(value), "duplicate sequence {value:#010X}");
                }
            });
        }
    });

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), total);
    assert_eq!(
        counter.current(),
        SEQUENCE_BASELINE + SEQUENCE_STRIDE * u32::try_from(total).unwrap()
    );
}

#[test]
fn atomic_first_values_start_at_baseline() {
    run_first_values_start_at_baseline(AtomicSequence::from_value(0xDEAD_BEEF));
}

#[test]
fn atomic_reset_restarts_at_baseline() {
    run_reset_restarts_at_baseline(AtomicSequence::new());
}

#[test]
fn atomic_clamps_values_below_baseline() {
    run_clamps_values_below_baseline(AtomicSequence::new());
}

#[test]
fn atomic_wraparound_restarts_at_baseline() {
    run_wraparound_restarts_at_baseline(AtomicSequence::new());
}

#[test]
fn atomic_values_above_baseline_are_kept() {
    run_values_above_baseline_are_kept(AtomicSequence::new());
}

#[test]
fn atomic_distinct_values_threaded() {
    run_distinct_values_threaded(AtomicSequence::new());
}

#[test]
fn atomic_shared_through_reference_and_arc() {
    let counter = Arc::new(AtomicSequence::new());
    let by_ref = &*counter;
    let by_arc = Arc::clone(&counter);

    assert_eq!(SequenceSource::next_sequence(&by_ref), SEQUENCE_BASELINE);
    assert_eq!(
        SequenceSource::next_sequence(&by_arc),
        SEQUENCE_BASELINE + SEQUENCE_STRIDE
    );
    assert_eq!(counter.current(), SEQUENCE_BASELINE + 2 * SEQUENCE_STRIDE);
}

#[test]
fn independent_counters_do_not_interfere() {
    let a = AtomicSequence::new();
    let b = AtomicSequence::new();
    a.next_sequence();
    a.next_sequence();
    assert_eq!(b.next_sequence(), SEQUENCE_BASELINE);
}

#[cfg(feature = "parking-lot")]
#[test]
fn lock_first_values_start_at_baseline() {
    run_first_values_start_at_baseline(LockSequence::new());
}

#[cfg(feature = "parking-lot")]
#[test]
fn lock_reset_restarts_at_baseline() {
    run_reset_restarts_at_baseline(LockSequence::new());
}

#[cfg(feature = "parking-lot")]
#[test]
fn lock_clamps_values_below_baseline() {
    run_clamps_values_below_baseline(LockSequence::new());
}

#[cfg(feature = "parking-lot")]
#[test]
fn lock_wraparound_restarts_at_baseline() {
    run_wraparound_restarts_at_baseline(LockSequence::new());
}

#[cfg(feature = "parking-lot")]
#[test]
fn lock_values_above_baseline_are_kept() {
    run_values_above_baseline_are_kept(LockSequence::new());
}

#[cfg(feature = "parking-lot")]
#[test]
fn lock_distinct_values_threaded() {
    run_distinct_values_threaded(LockSequence::new());
}
