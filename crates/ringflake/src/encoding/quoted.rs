use crate::{SnowflakeId, encoding::DecodeError};

const QUOTE: u8 = b'"';

/// Writes `id` as its decimal form surrounded by double quotes.
pub fn to_quoted(id: SnowflakeId) -> String {
    format!("\"{}\"", id.to_raw())
}

/// Parses a quoted decimal ID such as `"1234"`.
///
/// The input must be at least three bytes long and start and end with a
/// double quote; the bytes in between must parse as an `i64`.
pub fn parse_quoted(input: &[u8]) -> Result<SnowflakeId, DecodeError> {
    let inner = match input {
        [QUOTE, inner @ .., QUOTE] if !inner.is_empty() => inner,
        _ => {
            return Err(DecodeError::Syntax {
                input: String::from_utf8_lossy(input).into_owned(),
            });
        }
    };
    let text = core::str::from_utf8(inner).map_err(|e| DecodeError::InvalidDecimal {
        input: String::from_utf8_lossy(inner).into_owned(),
        reason: e.to_string(),
    })?;
    text.parse()
}
