use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Seconds in the default cookie lifetime (365 days).
pub const DEFAULT_COOKIE_LIFETIME: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// A trait for wall-clock time sources.
///
/// This abstraction allows you to plug in the real system clock or a fixed
/// time in tests.
///
/// # Example
///
/// ```
/// use castanet::TimeSource;
/// use std::time::Duration;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn now(&self) -> Duration {
///         Duration::new(1_700_000_000, 250_000_000)
///     }
/// }
///
/// assert_eq!(FixedTime.now().as_secs(), 1_700_000_000);
/// ```
pub trait TimeSource {
    /// Returns the time elapsed since the UNIX epoch.
    fn now(&self) -> Duration;

    /// Returns the current time in whole seconds, truncated to 32 bits.
    fn unix_seconds(&self) -> u32 {
        truncate_seconds(self.now())
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// The system wall clock.
///
/// A clock set before the UNIX epoch reads as the epoch itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> Duration {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
    }
}

/// A clock frozen at a fixed instant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixedClock(pub Duration);

impl FixedClock {
    /// A clock frozen at `secs` seconds and `micros` microseconds past the
    /// epoch. Whole seconds in `micros` carry into `secs`, saturating at
    /// `u64::MAX`.
    #[must_use]
    pub const fn from_secs_micros(secs: u64, micros: u32) -> Self {
        let carry = (micros / 1_000_000) as u64;
        Self(Duration::new(
            secs.saturating_add(carry),
            (micros % 1_000_000) * 1_000,
        ))
    }
}

impl TimeSource for FixedClock {
    fn now(&self) -> Duration {
        self.0
    }
}

/// Truncates a duration to whole seconds, wrapping modulo 2^32.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn truncate_seconds(elapsed: Duration) -> u32 {
    elapsed.as_secs() as u32
}
