//! `serde` adapters for [`Identifier`].
//!
//! Use them through `#[serde(with = "...")]`:
//!
//! ```
//! use castanet::Identifier;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Visit {
//!     #[serde(with = "castanet::as_cookie")]
//!     uid: Identifier,
//! }
//! ```
//!
//! [`Identifier`]: crate::Identifier

pub mod as_cookie {
    use ::serde::{Deserialize, Deserializer, Serializer, de};

    use crate::{Identifier, decode_cookie, encode_cookie};

    /// Serialize an identifier as its base64 cookie value.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &Identifier, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&encode_cookie(id))
    }

    /// Deserialize an identifier from its base64 cookie value.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The string is not a valid cookie value
    pub fn deserialize<'de, D>(d: D) -> Result<Identifier, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(d)?;
        decode_cookie(&text).map_err(de::Error::custom)
    }
}

pub mod as_fields {
    use ::serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::Identifier;

    /// Serialize an identifier as `[service_id, timestamp, start_value,
    /// sequence]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &Identifier, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        id.fields().serialize(s)
    }

    /// Deserialize an identifier from a four-element integer sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails or the input is
    /// not four `u32` values.
    pub fn deserialize<'de, D>(d: D) -> Result<Identifier, D::Error>
    where
        D: Deserializer<'de>,
    {
        <[u32; 4]>::deserialize(d).map(Identifier::from_fields)
    }
}

/// Serialize-only adapter for the legacy log value.
///
/// A legacy log value cannot always be read back: a field rendered as
/// `000000NN` may be `0xNN` or `0xNN000000`. Use it with
/// `#[serde(serialize_with = "castanet::as_log::serialize")]`.
pub mod as_log {
    use ::serde::Serializer;

    use crate::{Identifier, format};

    /// Serialize an identifier as its legacy log value.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &Identifier, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&format(id))
    }
}
