//! The per-request decode-or-create interaction.
//!
//! A [`Tracker`] reads the tracking cookie from the request. If the cookie is
//! present it is decoded, otherwise a fresh identifier is issued and a new
//! cookie is written. Either way the log rendering is recorded as notes:
//!
//! - [`NOTE_NAME_GOT`] when the identifier came from the presented cookie,
//! - [`NOTE_NAME_SET`] when it was freshly issued,
//! - [`NOTE_NAME_MERGED`] on every interaction.

mod notes;
mod transport;

pub use notes::*;
pub use transport::*;

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

use crate::{
    Identifier, IdentifierFactory, LogFormatter, RequestContext, Result, SequenceSource,
    TimeSource, UidConfig, encode_cookie,
};

/// Note recorded when a fresh identifier was issued.
pub const NOTE_NAME_SET: &str = "uid_set";

/// Note recorded when the identifier was read from the presented cookie.
pub const NOTE_NAME_GOT: &str = "uid_got";

/// Note recorded on every interaction.
pub const NOTE_NAME_MERGED: &str = "uid";

/// What to do when the presented cookie cannot be decoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DecodeFailurePolicy {
    /// Treat the cookie as absent: issue a fresh identifier and overwrite it.
    #[default]
    Reissue,
    /// Fail the interaction with [`Error::InvalidCookieFormat`].
    ///
    /// [`Error::InvalidCookieFormat`]: crate::Error::InvalidCookieFormat
    Reject,
}

/// Where the identifier of an interaction came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Decoded from the cookie the client presented.
    Got,
    /// Freshly issued, and a new cookie was written.
    Set,
}

impl Origin {
    /// The note this origin is recorded under.
    #[must_use]
    pub const fn note_name(self) -> &'static str {
        match self {
            Self::Got => NOTE_NAME_GOT,
            Self::Set => NOTE_NAME_SET,
        }
    }
}

/// The outcome of one tracked interaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tracked {
    pub identifier: Identifier,
    pub origin: Origin,
    /// The log rendering recorded in the notes.
    pub log_value: String,
    /// What the [`Origin::note_name`] note held before this interaction.
    pub previous_note: Option<String>,
}

/// Issues and recognizes tracking cookies.
///
/// A tracker starts disabled, as the web-server modules do. Call
/// [`Tracker::enable`] before handling requests.
///
/// # Example
///
/// ```
/// use castanet::{
///     AtomicSequence, FixedClock, FixedContext, IdentifierFactory, MemoryNotes,
///     MemoryTransport, Origin, Tracker, UidConfig, NOTE_NAME_MERGED,
/// };
///
/// let counter = AtomicSequence::new();
/// let factory = IdentifierFactory::new(&counter, FixedContext::default(), FixedClock::default());
/// let tracker = Tracker::new(factory, UidConfig::default()).enable();
///
/// let mut transport = MemoryTransport::new();
/// let mut notes = MemoryNotes::new();
/// let tracked = tracker
///     .start(&mut transport, Some(&mut notes))?
///     .expect("tracker is enabled");
///
/// assert_eq!(tracked.origin, Origin::Set);
/// assert_eq!(transport.outgoing().len(), 1);
/// assert_eq!(notes.get(NOTE_NAME_MERGED), Some(tracked.log_value.as_str()));
/// # Ok::<(), castanet::Error>(())
/// ```
#[derive(Debug)]
pub struct Tracker<S, C, T> {
    factory: IdentifierFactory<S, C, T>,
    config: UidConfig,
    enabled: bool,
    on_decode_failure: DecodeFailurePolicy,
    formatter: LogFormatter,
}

impl<S, C, T> Tracker<S, C, T>
where
    S: SequenceSource,
    C: RequestContext,
    T: TimeSource,
{
    /// Creates a disabled tracker. Identifier overrides in `config` are
    /// applied to `factory`.
    pub fn new(factory: IdentifierFactory<S, C, T>, config: UidConfig) -> Self {
        Self {
            factory: factory.with_config(&config),
            config,
            enabled: false,
            on_decode_failure: DecodeFailurePolicy::default(),
            formatter: LogFormatter::default(),
        }
    }

    #[must_use]
    pub fn with_decode_failure_policy(mut self, policy: DecodeFailurePolicy) -> Self {
        self.on_decode_failure = policy;
        self
    }

    #[must_use]
    pub fn with_log_formatter(mut self, formatter: LogFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    #[must_use]
    pub fn set_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn enable(self) -> Self {
        self.set_enabled(true)
    }

    #[must_use]
    pub fn disable(self) -> Self {
        self.set_enabled(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn config(&self) -> &UidConfig {
        &self.config
    }

    pub fn factory(&self) -> &IdentifierFactory<S, C, T> {
        &self.factory
    }

    /// Runs one interaction.
    ///
    /// Returns `Ok(None)` without touching the transport or the notes when the
    /// tracker is disabled. `notes` may be `None` when no sink is available.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCookieFormat`] only when the presented cookie
    /// is malformed and the policy is [`DecodeFailurePolicy::Reject`].
    ///
    /// [`Error::InvalidCookieFormat`]: crate::Error::InvalidCookieFormat
    pub fn start<X>(
        &self,
        transport: &mut X,
        notes: Option<&mut dyn NoteSink>,
    ) -> Result<Option<Tracked>>
    where
        X: CookieTransport + ?Sized,
    {
        if !self.enabled {
            return Ok(None);
        }

        let (identifier, origin) = match transport.read_incoming(&self.config.name) {
            Some(text) => match self.factory.create_from_cookie(&text) {
                Ok(id) => (id, Origin::Got),
                Err(err) => match self.on_decode_failure {
                    DecodeFailurePolicy::Reject => return Err(err),
                    DecodeFailurePolicy::Reissue => {
                        #[cfg(feature = "tracing")]
                        warn!(cookie = %text, error = %err, "reissuing malformed tracking cookie");
                        (self.issue(transport), Origin::Set)
                    }
                },
            },
            None => (self.issue(transport), Origin::Set),
        };

        let log_value = self.formatter.format(&identifier);
        #[cfg(feature = "tracing")]
        debug!(uid = %log_value, ?origin, "tracked client");

        let previous_note = notes.and_then(|sink| {
            sink.record(NOTE_NAME_MERGED, &log_value);
            sink.record(origin.note_name(), &log_value)
        });

        Ok(Some(Tracked {
            identifier,
            origin,
            log_value,
            previous_note,
        }))
    }

    fn issue<X>(&self, transport: &mut X) -> Identifier
    where
        X: CookieTransport + ?Sized,
    {
        let identifier = self.factory.create_fresh(None, None);
        let now = self.factory.time().now().as_secs();
        transport.write_outgoing(SetCookie {
            name: self.config.name.clone(),
            value: encode_cookie(&identifier),
            expires_at: self.config.expires_at(now),
            path: self.config.path.clone(),
            domain: self.config.domain.clone(),
            p3p: self.config.p3p,
        });
        identifier
    }
}
