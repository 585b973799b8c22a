/// Errors produced while decoding an ID from one of its textual forms.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// The quoted form was too short or not wrapped in double quotes.
    #[error("invalid snowflake ID {input:?}")]
    Syntax { input: String },

    /// The text between the quotes (or the bare text) is not an `i64`.
    #[error("invalid decimal snowflake ID {input:?}: {reason}")]
    InvalidDecimal { input: String, reason: String },
}
