use core::fmt;

/// Size in bytes of a serialized [`Identifier`].
pub const IDENTIFIER_SIZE: usize = 16;

/// A 128-bit client identifier made of four 32-bit fields.
///
/// The layout mirrors the token issued by Apache's `mod_uid` and nginx's
/// `ngx_http_userid_module`:
///
/// ```text
///  Bit Index:  127           96 95            64 63            32 31             0
///              +---------------+----------------+----------------+---------------+
///  Field:      |  service_id   |   timestamp    |  start_value   |   sequence    |
///              +---------------+----------------+----------------+---------------+
/// ```
///
/// An `Identifier` never changes after construction. Build a new one to
/// "update" it.
///
/// # Example
///
/// ```
/// use castanet::Identifier;
///
/// let id = Identifier::from_components(0x7F00_0001, 0x6500_0000, 0, 0x0303_0302);
/// assert_eq!(id.service_id(), 0x7F00_0001);
/// assert_eq!(Identifier::from_raw(id.to_raw()), id);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier {
    service_id: u32,
    timestamp: u32,
    start_value: u32,
    sequence: u32,
}

impl Identifier {
    /// Builds an identifier from its four fields.
    #[must_use]
    pub const fn from_components(
        service_id: u32,
        timestamp: u32,
        start_value: u32,
        sequence: u32,
    ) -> Self {
        Self {
            service_id,
            timestamp,
            start_value,
            sequence,
        }
    }

    /// Builds an identifier from a `[service_id, timestamp, start_value,
    /// sequence]` tuple.
    #[must_use]
    pub const fn from_fields(fields: [u32; 4]) -> Self {
        Self::from_components(fields[0], fields[1], fields[2], fields[3])
    }

    /// Identifies the issuing server instance, usually its IPv4 address.
    #[must_use]
    pub const fn service_id(&self) -> u32 {
        self.service_id
    }

    /// Issuance time in seconds since the UNIX epoch, truncated to 32 bits.
    #[must_use]
    pub const fn timestamp(&self) -> u32 {
        self.timestamp
    }

    /// Per-process-start entropy.
    #[must_use]
    pub const fn start_value(&self) -> u32 {
        self.start_value
    }

    /// Per-issuance discriminator drawn from a sequence counter.
    #[must_use]
    pub const fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Returns the fields in wire order.
    #[must_use]
    pub const fn fields(&self) -> [u32; 4] {
        [
            self.service_id,
            self.timestamp,
            self.start_value,
            self.sequence,
        ]
    }

    /// Packs the fields into a single integer, `service_id` in the most
    /// significant bits.
    #[must_use]
    pub const fn to_raw(&self) -> u128 {
        ((self.service_id as u128) << 96)
            | ((self.timestamp as u128) << 64)
            | ((self.start_value as u128) << 32)
            | (self.sequence as u128)
    }

    /// Inverse of [`Self::to_raw`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_raw(raw: u128) -> Self {
        Self::from_components(
            (raw >> 96) as u32,
            (raw >> 64) as u32,
            (raw >> 32) as u32,
            raw as u32,
        )
    }

    /// Returns the 16-byte cookie payload: four big-endian `u32` values.
    #[must_use]
    pub const fn to_be_bytes(&self) -> [u8; IDENTIFIER_SIZE] {
        self.to_raw().to_be_bytes()
    }

    /// Reads an identifier from its 16-byte cookie payload.
    #[must_use]
    pub const fn from_be_bytes(bytes: [u8; IDENTIFIER_SIZE]) -> Self {
        Self::from_raw(u128::from_be_bytes(bytes))
    }
}

impl From<[u32; 4]> for Identifier {
    fn from(fields: [u32; 4]) -> Self {
        Self::from_fields(fields)
    }
}

impl From<Identifier> for [u32; 4] {
    fn from(id: Identifier) -> Self {
        id.fields()
    }
}

/// Renders the legacy log form, see [`crate::format`].
impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::log::write_fields(f, self.fields(), true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_layout_places_service_id_in_high_bits() {
        let id = Identifier::from_components(0x0102_0304, 0x0506_0708, 0x090A_0B0C, 0x0D0E_0F10);
        assert_eq!(id.to_raw(), 0x0102_0304_0506_0708_090A_0B0C_0D0E_0F10);
        assert_eq!(
            id.to_be_bytes(),
            [
                0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D,
                0x0E, 0x0F, 0x10
            ]
        );
    }

    #[test]
    fn raw_and_bytes_are_inverse() {
        for id in [
            Identifier::default(),
            Identifier::from_components(u32::MAX, u32::MAX, u32::MAX, u32::MAX),
            Identifier::from_components(1, 0, u32::MAX, 0x0303_0302),
        ] {
            assert_eq!(Identifier::from_raw(id.to_raw()), id);
            assert_eq!(Identifier::from_be_bytes(id.to_be_bytes()), id);
        }
    }

    const BOUNDARIES: [u32; 6] = [0, 1, 0xFF, 0x100, 0xFF00_0000, u32::MAX];

    fn run_layout_round_trip(fields: [u32; 4]) {
        let id = Identifier::from_fields(fields);
        assert_eq!(id.fields(), fields);
        assert_eq!(Identifier::from_raw(id.to_raw()), id);
        assert_eq!(Identifier::from_be_bytes(id.to_be_bytes()), id);
        for (i, field) in fields.iter().enumerate() {
            assert_eq!(id.to_be_bytes()[i * 4..i * 4 + 4], field.to_be_bytes());
        }
    }

    #[test]
    fn layout_round_trips_across_field_boundaries() {
        for a in BOUNDARIES {
            for b in BOUNDARIES {
                for c in BOUNDARIES {
                    for d in BOUNDARIES {
                        run_layout_round_trip([a, b, c, d]);
                    }
                }
            }
        }
    }

    #[test]
    fn fields_follow_wire_order() {
        let id = Identifier::from_fields([4, 3, 2, 1]);
        assert_eq!(id.service_id(), 4);
        assert_eq!(id.timestamp(), 3);
        assert_eq!(id.start_value(), 2);
        assert_eq!(id.sequence(), 1);
        assert_eq!(<[u32; 4]>::from(id), [4, 3, 2, 1]);
    }

    #[test]
    fn ordering_follows_raw_value() {
        let a = Identifier::from_components(1, u32::MAX, u32::MAX, u32::MAX);
        let b = Identifier::from_components(2, 0, 0, 0);
        assert!(a < b);
        assert!(a.to_raw() < b.to_raw());
    }
}
