//! Error types shared across the crate.
//!
//! Startup failures ([`Error::Config`], [`Error::CollisionResolution`]) are
//! fatal: a process must not serve traffic without a confirmed identity.
//! [`Error::ClockRegression`] and [`Error::TimestampOutOfRange`] are returned
//! per call by the generator and
//! [`Error::Decode`] per call by the decoders; neither poisons any state.

use crate::encoding::DecodeError;

/// A result type defaulting to the crate [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `ringflake` can emit.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Invalid layout, unresolvable address or malformed peer entry.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A peer could not be queried while confirming a slot collision.
    #[cfg(feature = "cluster")]
    #[error("failed to query peer {peer} for its node identity: {source}")]
    CollisionResolution {
        /// URL of the peer that failed.
        peer: String,
        /// Underlying transport or protocol failure.
        #[source]
        source: crate::cluster::PeerError,
    },

    /// The sequence for the current millisecond was exhausted and the clock
    /// did not advance within the bounded wait.
    #[error(
        "clock did not advance past {last_timestamp}ms after {attempts} attempts (now = {now}ms); \
         check whether the local clock moved backwards"
    )]
    ClockRegression {
        /// Timestamp of the last issued ID, relative to the epoch.
        last_timestamp: i64,
        /// Last sampled time, relative to the epoch.
        now: i64,
        /// Number of sleep-and-resample attempts made.
        attempts: u32,
    },

    /// The clock reading does not fit the layout's timestamp field, either
    /// because it predates the epoch or because the field has run out.
    #[error("timestamp {now}ms is outside the layout's range 0..={max}ms; check the epoch and time bits")]
    TimestampOutOfRange {
        /// Sampled time, relative to the epoch.
        now: i64,
        /// Largest timestamp the layout can encode.
        max: i64,
    },

    /// A textual or binary form could not be decoded into an ID.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Configuration problems detected before any ID is generated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Node and sequence fields must share at most 22 bits.
    #[error("node bits ({node_bits}) + step bits ({step_bits}) exceed the 22-bit budget")]
    LayoutBudget { node_bits: u8, step_bits: u8 },

    /// All three fields must fit in the 63 non-sign bits of an `i64`.
    #[error("layout of {total} bits does not fit in a non-negative i64")]
    LayoutWidth { total: u32 },

    /// A self or peer host is neither an IP literal nor a valid domain name.
    #[error("{host} is not an IP address or a valid domain name")]
    InvalidAddress { host: String },

    /// A domain name resolved to nothing (or resolution failed).
    #[error("could not find records for domain {host}: {reason}")]
    NoRecords { host: String, reason: String },

    /// A `host[:port]` peer entry could not be parsed.
    #[error("invalid peer entry {entry:?}: {reason}")]
    InvalidPeer { entry: String, reason: String },

    /// The machine hostname could not be determined.
    #[error("could not determine local hostname: {reason}")]
    Hostname { reason: String },

    /// Startup identity resolution did not finish in time.
    #[error("node identity resolution timed out after {millis}ms")]
    BootstrapTimeout { millis: u64 },
}
