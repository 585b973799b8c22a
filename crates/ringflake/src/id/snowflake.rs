use core::{fmt, str::FromStr};

use crate::encoding::{self, DecodeError};

/// A packed 64-bit Snowflake identifier.
///
/// The value is an opaque `i64`; splitting it into timestamp, node and
/// sequence requires the [`Layout`] it was generated with.
///
/// Conversions provided here are lossless unless stated otherwise:
///
/// - decimal text via [`Display`](fmt::Display) / [`FromStr`]
/// - 8-byte big-endian via [`Self::to_be_bytes`] / [`Self::from_be_bytes`]
/// - quoted decimal via [`Self::to_quoted`] / [`Self::parse_quoted`]
/// - fixed-width base62 via [`Self::to_base62`] (lossy, encode only)
///
/// [`Layout`]: crate::Layout
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SnowflakeId(i64);

impl SnowflakeId {
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> i64 {
        self.0
    }

    /// Returns the ID as an 8-byte big-endian array.
    pub const fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Reads an ID written by [`Self::to_be_bytes`].
    pub const fn from_be_bytes(bytes: [u8; 8]) -> Self {
        Self(i64::from_be_bytes(bytes))
    }

    /// Renders the ID as `width` base62 digits, most significant first.
    ///
    /// A `width` of zero selects [`DEFAULT_BASE62_WIDTH`]. When the ID does not
    /// fit in `width` digits only the low-order digits are kept; there is no
    /// inverse of this conversion.
    ///
    /// # Example
    ///
    /// ```
    /// use ringflake::SnowflakeId;
    ///
    /// let id = SnowflakeId::from_raw(62 * 62 + 1);
    /// assert_eq!(id.to_base62(4), "0101");
    /// assert_eq!(id.to_base62(2), "01");
    /// ```
    ///
    /// [`DEFAULT_BASE62_WIDTH`]: crate::DEFAULT_BASE62_WIDTH
    pub fn to_base62(self, width: usize) -> String {
        encoding::encode_base62(self.0 as u64, width)
    }

    /// The decimal form wrapped in double quotes, e.g. `"42"`.
    pub fn to_quoted(self) -> String {
        encoding::to_quoted(self)
    }

    /// Parses the output of [`Self::to_quoted`].
    ///
    /// # Errors
    ///
    /// - [`DecodeError::Syntax`] if the input is shorter than three bytes or
    ///   is not wrapped in double quotes
    /// - [`DecodeError::InvalidDecimal`] if the quoted text is not an `i64`
    pub fn parse_quoted(input: &[u8]) -> Result<Self, DecodeError> {
        encoding::parse_quoted(input)
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SnowflakeId").field(&self.0).finish()
    }
}

impl FromStr for SnowflakeId {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>()
            .map(Self)
            .map_err(|e| DecodeError::InvalidDecimal {
                input: s.to_owned(),
                reason: e.to_string(),
            })
    }
}

impl From<i64> for SnowflakeId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl From<SnowflakeId> for i64 {
    fn from(id: SnowflakeId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EDGES: [i64; 7] = [0, 1, -1, 42, 1 << 40, i64::MIN, i64::MAX];

    #[test]
    fn decimal_roundtrip() {
        for raw in EDGES {
            let id = SnowflakeId::from_raw(raw);
            let back: SnowflakeId = id.to_string().parse().unwrap();
            assert_eq!(back, id);
        }
    }

    #[test]
    fn be_bytes_roundtrip() {
        for raw in EDGES {
            let id = SnowflakeId::from_raw(raw);
            assert_eq!(SnowflakeId::from_be_bytes(id.to_be_bytes()), id);
        }
    }

    #[test]
    fn be_bytes_layout_is_big_endian() {
        let id = SnowflakeId::from_raw(0x0102_0304_0506_0708);
        assert_eq!(id.to_be_bytes(), [1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn rejects_non_decimal_text() {
        let err = "12a".parse::<SnowflakeId>().unwrap_err();
        assert!(matches!(err, DecodeError::InvalidDecimal { ref input, .. } if input == "12a"));
        assert!("".parse::<SnowflakeId>().is_err());
        assert!("9223372036854775808".parse::<SnowflakeId>().is_err());
    }

    #[test]
    fn display_is_plain_decimal() {
        assert_eq!(SnowflakeId::from_raw(1_234_567).to_string(), "1234567");
        assert_eq!(
            format!("{:?}", SnowflakeId::from_raw(9)),
            "SnowflakeId(9)"
        );
    }
}
