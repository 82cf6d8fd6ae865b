use portable_atomic::{AtomicU32, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::sequence::{SEQUENCE_BASELINE, SequenceSource, advance};

/// A lock-free sequence counter suitable for multi-threaded servers.
///
/// The counter state lives in an [`AtomicU32`] and is advanced with a
/// compare-and-swap loop, so concurrent callers never observe the same value
/// unless the counter wraps.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Lock-free
///
/// ## Recommended When
/// - Many request handlers issue identifiers concurrently
///
/// ## See Also
/// - [`LockSequence`]
///
/// [`LockSequence`]: crate::LockSequence
///
/// # Example
/// ```
/// use castanet::{AtomicSequence, SequenceSource, SEQUENCE_BASELINE};
///
/// let counter = AtomicSequence::new();
/// assert_eq!(counter.next_sequence(), SEQUENCE_BASELINE);
/// assert_eq!(counter.next_sequence(), SEQUENCE_BASELINE + 0x100);
/// ```
#[derive(Debug)]
pub struct AtomicSequence {
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<AtomicU32>,
    #[cfg(not(feature = "cache-padded"))]
    state: AtomicU32,
}

impl AtomicSequence {
    /// Creates a counter starting at [`SEQUENCE_BASELINE`].
    #[must_use]
    pub fn new() -> Self {
        Self::from_value(SEQUENCE_BASELINE)
    }

    /// Creates a counter starting at an explicit value.
    ///
    /// Values below [`SEQUENCE_BASELINE`] are accepted and clamped on first
    /// use.
    #[must_use]
    pub fn from_value(value: u32) -> Self {
        Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(AtomicU32::new(value)),
            #[cfg(not(feature = "cache-padded"))]
            state: AtomicU32::new(value),
        }
    }

    /// Returns the current value and advances the counter.
    ///
    /// See [`SequenceSource::next_sequence`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_sequence(&self) -> u32 {
        let mut current = self.state.load(Ordering::Relaxed);
        loop {
            let (issued, next) = advance(current);
            match self.state.compare_exchange_weak(
                current,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return issued,
                // Another thread won the race; retry against its value.
                Err(actual) => current = actual,
            }
        }
    }
}

impl Default for AtomicSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceSource for AtomicSequence {
    fn next_sequence(&self) -> u32 {
        self.next_sequence()
    }

    fn reset(&self) {
        self.state.store(SEQUENCE_BASELINE, Ordering::Relaxed);
    }

    fn set(&self, value: u32) {
        self.state.store(value, Ordering::Relaxed);
    }

    fn current(&self) -> u32 {
        self.state.load(Ordering::Relaxed)
    }
}
