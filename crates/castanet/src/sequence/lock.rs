use parking_lot::Mutex;
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::sequence::{SEQUENCE_BASELINE, SequenceSource, advance};

/// A mutex-guarded sequence counter.
///
/// Uses a [`parking_lot::Mutex`], which does not poison, so every operation is
/// infallible. Prefer [`AtomicSequence`] unless fair access under heavy
/// contention matters more than raw throughput.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Fair access under contention
///
/// [`AtomicSequence`]: crate::AtomicSequence
#[derive(Debug)]
pub struct LockSequence {
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<Mutex<u32>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Mutex<u32>,
}

impl LockSequence {
    /// Creates a counter starting at [`SEQUENCE_BASELINE`].
    #[must_use]
    pub fn new() -> Self {
        Self::from_value(SEQUENCE_BASELINE)
    }

    /// Creates a counter starting at an explicit value.
    #[must_use]
    pub fn from_value(value: u32) -> Self {
        Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(Mutex::new(value)),
            #[cfg(not(feature = "cache-padded"))]
            state: Mutex::new(value),
        }
    }

    /// Returns the current value and advances the counter.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_sequence(&self) -> u32 {
        let mut state = self.state.lock();
        let (issued, next) = advance(*state);
        *state = next;
        issued
    }
}

impl Default for LockSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceSource for LockSequence {
    fn next_sequence(&self) -> u32 {
        self.next_sequence()
    }

    fn reset(&self) {
        *self.state.lock() = SEQUENCE_BASELINE;
    }

    fn set(&self, value: u32) {
        *self.state.lock() = value;
    }

    fn current(&self) -> u32 {
        *self.state.lock()
    }
}
