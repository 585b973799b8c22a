use crate::{ClockRecovery, IdGenStatus, Layout, NodeIdentity, Result, SnowflakeId};

/// A minimal interface for generating Snowflake IDs.
pub trait SnowflakeGenerator {
    /// Identity embedded in every ID.
    fn node(&self) -> NodeIdentity;

    /// Bit layout of the produced IDs.
    fn layout(&self) -> Layout;

    /// Bound on waiting for a stalled clock.
    fn recovery(&self) -> ClockRecovery;

    /// Makes one attempt at generating an ID without sleeping.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TimestampOutOfRange`] if the clock reading does not
    /// fit the layout.
    ///
    /// [`Error::TimestampOutOfRange`]: crate::Error::TimestampOutOfRange
    fn try_poll(&self) -> Result<IdGenStatus>;

    /// Generates the next ID, waiting for a stalled clock if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockRegression`] if the sequence is exhausted and
    /// the clock does not advance within [`Self::recovery`], or
    /// [`Error::TimestampOutOfRange`] if the clock does not fit the layout.
    ///
    /// [`Error::ClockRegression`]: crate::Error::ClockRegression
    /// [`Error::TimestampOutOfRange`]: crate::Error::TimestampOutOfRange
    fn generate(&self) -> Result<SnowflakeId>;
}
