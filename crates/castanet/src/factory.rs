use core::time::Duration;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Identifier, RequestContext, Result, SequenceSource, TimeSource, UidConfig, decode_cookie,
};

/// Service id used when neither a hint nor the request context provides one.
pub const FALLBACK_SERVICE_ID: u32 = 1;

/// Builds [`Identifier`]s, either fresh or from a presented cookie.
///
/// Construction has two phases. The factory first gathers everything an
/// identifier needs (service id, timestamp, start value). It then builds an
/// immutable [`Identifier`] in one step. The start value is derived once, when
/// the factory is created, and reused for every identifier it issues.
///
/// The sequence counter is injected. Share one counter between factories by
/// passing `&counter` or an `Arc`.
///
/// # Example
///
/// ```
/// use castanet::{
///     AtomicSequence, FixedClock, FixedContext, IdentifierFactory, SEQUENCE_BASELINE,
/// };
///
/// let counter = AtomicSequence::new();
/// let context = FixedContext {
///     local_address: Some(0x7F00_0001),
///     request_time: Some(1_700_000_000),
///     process_id: 4242,
/// };
/// let factory = IdentifierFactory::new(&counter, context, FixedClock::default());
///
/// let id = factory.create_fresh(None, None);
/// assert_eq!(id.service_id(), 0x7F00_0001);
/// assert_eq!(id.timestamp(), 1_700_000_000);
/// assert_eq!(id.start_value(), 4242);
/// assert_eq!(id.sequence(), SEQUENCE_BASELINE);
/// ```
#[derive(Debug)]
pub struct IdentifierFactory<S, C, T> {
    sequence: S,
    context: C,
    time: T,
    start_value: u32,
    service_override: Option<u32>,
    timestamp_override: Option<u32>,
}

impl<S, C, T> IdentifierFactory<S, C, T>
where
    S: SequenceSource,
    C: RequestContext,
    T: TimeSource,
{
    /// Creates a factory, deriving the start value from the current
    /// sub-second clock reading and the process id.
    pub fn new(sequence: S, context: C, time: T) -> Self {
        let start_value = derive_start_value(time.now(), context.process_id());
        Self {
            sequence,
            context,
            time,
            start_value,
            service_override: None,
            timestamp_override: None,
        }
    }

    /// Applies the `service`, `timestamp` and `start_value` overrides of
    /// `config`. Options the config leaves unset keep their derived values.
    #[must_use]
    pub fn with_config(mut self, config: &UidConfig) -> Self {
        if let Some(service) = config.service {
            self.service_override = Some(service);
        }
        if let Some(timestamp) = config.timestamp {
            self.timestamp_override = Some(timestamp);
        }
        if let Some(start_value) = config.start_value {
            self.start_value = start_value;
        }
        self
    }

    /// The start value stamped into every fresh identifier.
    pub fn start_value(&self) -> u32 {
        self.start_value
    }

    /// The injected sequence counter.
    pub fn sequence(&self) -> &S {
        &self.sequence
    }

    /// The injected request context.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// The injected clock.
    pub fn time(&self) -> &T {
        &self.time
    }

    /// Issues a new identifier and advances the sequence counter once.
    ///
    /// The service id comes from the first available of: `service_hint`, the
    /// configured override, [`RequestContext::local_address`], and
    /// [`FALLBACK_SERVICE_ID`]. The timestamp comes from the first available
    /// of: `time_hint`, the configured override,
    /// [`RequestContext::request_time`], and the clock.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn create_fresh(&self, service_hint: Option<u32>, time_hint: Option<u32>) -> Identifier {
        let service_id = service_hint
            .or(self.service_override)
            .or_else(|| self.context.local_address())
            .unwrap_or(FALLBACK_SERVICE_ID);
        let timestamp = time_hint
            .or(self.timestamp_override)
            .or_else(|| self.context.request_time())
            .unwrap_or_else(|| self.time.unix_seconds());

        Identifier::from_components(
            service_id,
            timestamp,
            self.start_value,
            self.sequence.next_sequence(),
        )
    }

    /// Decodes a presented cookie.
    ///
    /// The counter and the context are not consulted. A malformed cookie is
    /// reported to the caller rather than replaced with a fresh identifier;
    /// [`Tracker`] decides what to do with it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCookieFormat`] if `text` is not a valid cookie.
    ///
    /// [`Tracker`]: crate::Tracker
    /// [`Error::InvalidCookieFormat`]: crate::Error::InvalidCookieFormat
    pub fn create_from_cookie(&self, text: &str) -> Result<Identifier> {
        Ok(decode_cookie(text)?)
    }
}

/// Derives per-process entropy from a clock reading and a process id.
///
/// The sub-second microseconds are divided by 20 to fit in 16 bits and placed
/// above the process id. A process id wider than 16 bits overlaps the clock
/// part, as it does in the web-server modules this mirrors.
#[must_use]
pub fn derive_start_value(now: Duration, process_id: u32) -> u32 {
    ((now.subsec_micros() / 20) << 16) | process_id
}
