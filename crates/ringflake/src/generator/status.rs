use crate::SnowflakeId;

/// Outcome of a single non-blocking generation attempt.
///
/// - [`IdGenStatus::Ready`] carries a freshly generated ID.
/// - [`IdGenStatus::Pending`] means every sequence value for the current
///   millisecond is used and the clock has not moved past it yet.
///
/// # Example
///
/// ```
/// use ringflake::{IdGenStatus, Layout, LockSnowflakeGenerator, NodeIdentity, TimeSource};
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> i64 {
///         1
///     }
/// }
///
/// let generator = LockSnowflakeGenerator::new(NodeIdentity::new(3), Layout::default(), FixedTime);
/// match generator.try_poll()? {
///     IdGenStatus::Ready { id } => println!("ID: {id}"),
///     IdGenStatus::Pending { last_timestamp, .. } => println!("exhausted at {last_timestamp}"),
/// }
/// # Ok::<(), ringflake::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated Snowflake ID.
        id: SnowflakeId,
    },
    /// The sequence space of `last_timestamp` is exhausted.
    ///
    /// Retry once the clock reads later than `last_timestamp`.
    Pending {
        /// Timestamp of the last issued ID.
        last_timestamp: i64,
        /// Time sampled by this attempt.
        now: i64,
    },
}
