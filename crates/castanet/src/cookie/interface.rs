use base64::{Engine, engine::general_purpose::STANDARD};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{CookieError, IDENTIFIER_SIZE, Identifier, Result};

/// Length of an encoded cookie value: 16 bytes as padded base64.
pub const COOKIE_SIZE: usize = 24;

/// Encodes an identifier as its cookie value.
///
/// The four fields are written as big-endian `u32` in the order `service_id,
/// timestamp, start_value, sequence`, then base64-encoded with the standard
/// padded alphabet. The result is always [`COOKIE_SIZE`] characters.
///
/// # Example
///
/// ```
/// use castanet::{encode_cookie, Identifier};
///
/// let id = Identifier::from_components(0x7F00_0001, 0x6500_0000, 0, 0x0303_0302);
/// assert_eq!(encode_cookie(&id), "fwAAAWUAAAAAAAAAAwMDAg==");
/// ```
#[must_use]
pub fn encode_cookie(id: &Identifier) -> String {
    STANDARD.encode(id.to_be_bytes())
}

/// Decodes a cookie value back into an identifier.
///
/// Decoding is all-or-nothing and accepts any 32-bit field values. Padding
/// must be canonical and the final symbol may not carry trailing bits, so
/// every identifier has exactly one cookie value.
///
/// # Errors
///
/// Returns a [`CookieError`] if `text` is not valid padded base64 or does not
/// decode to exactly 16 bytes.
#[cfg_attr(feature = "tracing", instrument(level = "trace"))]
pub fn decode_cookie(text: &str) -> Result<Identifier, CookieError> {
    let bytes = STANDARD.decode(text)?;
    let payload: [u8; IDENTIFIER_SIZE] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| CookieError::InvalidPayloadLength { len: bytes.len() })?;
    Ok(Identifier::from_be_bytes(payload))
}

/// Extension trait for moving identifiers in and out of cookie values.
pub trait CookieExt: Sized {
    /// Encodes `self` as a cookie value. See [`encode_cookie`].
    fn to_cookie(&self) -> String;

    /// Parses a cookie value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCookieFormat`] if the value is malformed.
    ///
    /// [`Error::InvalidCookieFormat`]: crate::Error::InvalidCookieFormat
    fn from_cookie(text: &str) -> Result<Self>;
}

impl CookieExt for Identifier {
    fn to_cookie(&self) -> String {
        encode_cookie(self)
    }

    fn from_cookie(text: &str) -> Result<Self> {
        Ok(decode_cookie(text)?)
    }
}
