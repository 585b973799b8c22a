use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::SnowflakeId;

/// Serializes as the quoted decimal form (`"1234"`), which keeps 64-bit IDs
/// intact in consumers that read JSON numbers as doubles.
impl Serialize for SnowflakeId {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SnowflakeId {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DecimalVisitor;

        impl de::Visitor<'_> for DecimalVisitor {
            type Value = SnowflakeId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a snowflake ID as a quoted decimal string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                v.parse().map_err(de::Error::custom)
            }
        }

        d.deserialize_str(DecimalVisitor)
    }
}

/// Serde adapter that keeps the ID as a bare integer.
///
/// ```
/// use ringflake::{SnowflakeId, as_native_snow};
///
/// #[derive(serde::Serialize)]
/// struct Row {
///     #[serde(with = "as_native_snow")]
///     id: SnowflakeId,
/// }
/// ```
pub mod as_native_snow {
    use super::{Deserialize, Deserializer, Serialize, Serializer};
    use crate::SnowflakeId;

    /// Serialize a snowflake ID as its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        id.to_raw().serialize(s)
    }

    /// Deserialize a snowflake ID from its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails.
    pub fn deserialize<'de, D>(d: D) -> Result<SnowflakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        i64::deserialize(d).map(SnowflakeId::from_raw)
    }
}
