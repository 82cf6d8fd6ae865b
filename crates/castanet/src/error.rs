use crate::CookieError;

/// A result type defaulting to the crate-wide [`enum@Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `castanet` can emit.
///
/// Issuing an identifier never fails. Missing request context falls back to
/// sentinel values and a missing note sink is skipped. The fallible paths are
/// parsing an incoming cookie and applying configuration.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The presented cookie is not the base64 encoding of exactly 16 bytes.
    #[error("invalid cookie format: {0}")]
    InvalidCookieFormat(#[from] CookieError),

    /// A configuration key outside the recognized set was supplied while the
    /// [`ConfigPolicy::Strict`] policy was active.
    ///
    /// [`ConfigPolicy::Strict`]: crate::ConfigPolicy::Strict
    #[error("unknown configuration key: {key}")]
    UnknownConfigKey { key: String },

    /// A recognized configuration key was given a value it cannot hold.
    #[error("invalid value for configuration key {key}: {value:?}")]
    InvalidConfigValue { key: &'static str, value: String },

    /// A log value could not be parsed back into an identifier.
    #[error("invalid log value: {reason}")]
    InvalidLogValue { reason: &'static str },
}
