//! Hexadecimal log rendering of identifiers.
//!
//! Historical deployments log identifiers as 32 uppercase hex digits, each
//! field byte-reversed ("networkized") before rendering. Downstream log
//! consumers match on those exact bytes, so the conversion here is an explicit
//! byte-array reversal that does not depend on host endianness.

use core::fmt::{self, Write};

use crate::{Error, Identifier, Result};

/// Length of a rendered log value.
pub const LOG_VALUE_SIZE: usize = 32;

/// Largest value passed through [`networkize`] unchanged.
const SINGLE_BYTE_MAX: u32 = 0xFF;

/// Reverses the byte order of `value` for legacy log output.
///
/// Values that render with two hex digits or fewer are returned unchanged.
///
/// # Example
///
/// ```
/// use castanet::networkize;
///
/// assert_eq!(networkize(0x7F00_0001), 0x0100_007F);
/// assert_eq!(networkize(0x0000_0001), 0x0000_0001);
/// ```
#[must_use]
pub const fn networkize(value: u32) -> u32 {
    if value <= SINGLE_BYTE_MAX {
        return value;
    }
    let [a, b, c, d] = value.to_be_bytes();
    u32::from_be_bytes([d, c, b, a])
}

/// Renders an identifier in the legacy log form.
///
/// # Example
///
/// ```
/// use castanet::{format, Identifier};
///
/// let id = Identifier::from_components(0x7F00_0001, 0x6500_0000, 0, 0x0303_0302);
/// assert_eq!(format(&id), "0100007F000000650000000002030303");
/// ```
#[must_use]
pub fn format(id: &Identifier) -> String {
    format_fields(id.fields())
}

/// Renders a raw `[service_id, timestamp, start_value, sequence]` tuple in the
/// legacy log form.
#[must_use]
pub fn format_fields(fields: [u32; 4]) -> String {
    LogFormatter::legacy().format_fields(fields)
}

/// Selects how identifiers are rendered into log values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LogFormatter {
    /// Networkize each field before rendering.
    #[default]
    Legacy,
    /// Render each field as-is.
    Raw,
}

impl LogFormatter {
    /// The networkized rendering used by historical deployments.
    #[must_use]
    pub const fn legacy() -> Self {
        Self::Legacy
    }

    /// Plain big-endian hex, without byte reversal.
    #[must_use]
    pub const fn raw() -> Self {
        Self::Raw
    }

    /// Renders an identifier.
    #[must_use]
    pub fn format(self, id: &Identifier) -> String {
        self.format_fields(id.fields())
    }

    /// Renders a raw field tuple.
    #[must_use]
    pub fn format_fields(self, fields: [u32; 4]) -> String {
        let mut out = String::with_capacity(LOG_VALUE_SIZE);
        // Writing into a String cannot fail.
        let _ = write_fields(&mut out, fields, self == Self::Legacy);
        out
    }

    /// Parses a rendered log value back into an identifier.
    ///
    /// Accepts upper- or lower-case hex. Under [`LogFormatter::Legacy`] a
    /// field rendered as `00000001` through `000000FF` may be a passed
    /// through small value or a byte-reversed `0xNN000000`. Such a field is
    /// rejected. [`LogFormatter::Raw`] parses every value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLogValue`] if `value` is not exactly 32 hex
    /// digits, or if a legacy field is ambiguous.
    pub fn parse(self, value: &str) -> Result<Identifier> {
        if value.len() != LOG_VALUE_SIZE {
            return Err(Error::InvalidLogValue {
                reason: "expected 32 hex digits",
            });
        }
        if !value.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidLogValue {
                reason: "non-hex character",
            });
        }

        let mut fields = [0_u32; 4];
        for (i, field) in fields.iter_mut().enumerate() {
            let digits = &value[i * 8..(i + 1) * 8];
            let parsed = u32::from_str_radix(digits, 16).map_err(|_| Error::InvalidLogValue {
                reason: "non-hex character",
            })?;
            *field = match self {
                Self::Legacy if (1..=0xFF).contains(&parsed) => {
                    return Err(Error::InvalidLogValue {
                        reason: "ambiguous single-byte field",
                    });
                }
                Self::Legacy => networkize(parsed),
                Self::Raw => parsed,
            };
        }
        Ok(Identifier::from_fields(fields))
    }
}

/// Parses a legacy log value. See [`LogFormatter::parse`].
///
/// # Errors
///
/// Returns [`Error::InvalidLogValue`] if `value` is not exactly 32 hex digits
/// or holds an ambiguous single-byte field.
pub fn parse_log(value: &str) -> Result<Identifier> {
    LogFormatter::legacy().parse(value)
}

pub(crate) fn write_fields<W: Write>(
    out: &mut W,
    fields: [u32; 4],
    networkized: bool,
) -> fmt::Result {
    for field in fields {
        let field = if networkized { networkize(field) } else { field };
        write!(out, "{field:08X}")?;
    }
    Ok(())
}
