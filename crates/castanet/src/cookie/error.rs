use base64::DecodeError;

/// Reasons a cookie value fails to decode.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum CookieError {
    /// The number of base64 symbols cannot encode a whole number of bytes.
    #[error("invalid base64 length: {len}")]
    InvalidLength { len: usize },

    /// A byte outside the standard base64 alphabet, or a `=` outside the
    /// trailing padding.
    #[error("invalid base64 byte {byte:#04x} at index {index}")]
    InvalidAscii { byte: u8, index: usize },

    /// Padding is missing or not the canonical amount.
    #[error("invalid base64 padding")]
    InvalidPadding,

    /// The last symbol before the padding carries bits that no encoder would
    /// emit.
    #[error("non-zero trailing bits at index {index}")]
    InvalidTrailingBits { index: usize },

    /// The text is valid base64 but does not hold exactly 16 bytes.
    #[error("decoded payload is {len} bytes, expected 16")]
    InvalidPayloadLength { len: usize },
}

impl From<DecodeError> for CookieError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::InvalidByte(index, byte) => Self::InvalidAscii { byte, index },
            DecodeError::InvalidLength(len) => Self::InvalidLength { len },
            DecodeError::InvalidLastSymbol(index, _) => Self::InvalidTrailingBits { index },
            DecodeError::InvalidPadding => Self::InvalidPadding,
        }
    }
}
