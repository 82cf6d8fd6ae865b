use std::sync::Arc;

/// Initial value of every sequence counter, and the floor it is clamped to.
pub const SEQUENCE_BASELINE: u32 = 0x0303_0302;

/// Amount a counter advances by on each issuance.
pub const SEQUENCE_STRIDE: u32 = 0x100;

/// A shared source of per-issuance sequence values.
///
/// Implementations must make [`SequenceSource::next_sequence`] an atomic
/// read-modify-write. Two calls that do not race never observe the same
/// value, and no call ever returns a value below [`SEQUENCE_BASELINE`].
pub trait SequenceSource {
    /// Returns the current value and advances the counter by
    /// [`SEQUENCE_STRIDE`].
    ///
    /// A current value below [`SEQUENCE_BASELINE`] is raised to the baseline
    /// before being returned. If advancing wraps past `u32::MAX` and lands
    /// below the baseline, the counter restarts at the baseline.
    fn next_sequence(&self) -> u32;

    /// Re-initializes the counter to [`SEQUENCE_BASELINE`].
    fn reset(&self);

    /// Overwrites the counter with `value`, without clamping.
    ///
    /// The baseline floor is applied by the next call to
    /// [`SequenceSource::next_sequence`].
    fn set(&self, value: u32);

    /// Returns the value the next call to [`SequenceSource::next_sequence`]
    /// starts from, without advancing.
    fn current(&self) -> u32;
}

/// Computes the value returned for `current` and the value stored after it.
#[inline]
pub(crate) const fn advance(current: u32) -> (u32, u32) {
    let issued = if current < SEQUENCE_BASELINE {
        SEQUENCE_BASELINE
    } else {
        current
    };
    let next = issued.wrapping_add(SEQUENCE_STRIDE);
    let next = if next < SEQUENCE_BASELINE {
        SEQUENCE_BASELINE
    } else {
        next
    };
    (issued, next)
}

impl<S: SequenceSource + ?Sized> SequenceSource for &S {
    fn next_sequence(&self) -> u32 {
        (**self).next_sequence()
    }

    fn reset(&self) {
        (**self).reset();
    }

    fn set(&self, value: u32) {
        (**self).set(value);
    }

    fn current(&self) -> u32 {
        (**self).current()
    }
}

impl<S: SequenceSource + ?Sized> SequenceSource for Arc<S> {
    fn next_sequence(&self) -> u32 {
        (**self).next_sequence()
    }

    fn reset(&self) {
        (**self).reset();
    }

    fn set(&self, value: u32) {
        (**self).set(value);
    }

    fn current(&self) -> u32 {
        (**self).current()
    }
}
