use parking_lot::Mutex;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    ClockRecovery, Error, IdGenStatus, Layout, NodeIdentity, Result, Sleep, SnowflakeGenerator,
    SnowflakeId, ThreadSleep, TimeSource,
};

/// Timestamp and sequence of the most recently issued ID.
#[derive(Debug)]
struct GeneratorState {
    last_timestamp: i64,
    sequence: u64,
}

impl GeneratorState {
    /// Moves the state forward for a clock reading of `now`.
    ///
    /// Returns the `(timestamp, sequence)` pair to encode, or `None` if the
    /// sequence of `last_timestamp` is exhausted. The state is untouched in
    /// that case.
    fn advance(&mut self, now: i64, max_sequence: u64) -> Option<(i64, u64)> {
        if now > self.last_timestamp {
            self.last_timestamp = now;
            self.sequence = 0;
            return Some((now, 0));
        }
        // The clock stalled or went backwards: keep stamping the newest
        // timestamp seen so IDs from this node never decrease.
        if self.sequence < max_sequence {
            self.sequence += 1;
            return Some((self.last_timestamp, self.sequence));
        }
        None
    }
}

/// A lock-based Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// All generation steps for one instance are serialized by a single mutex;
/// no caller can observe a half-updated state. The node identity and layout
/// are fixed at construction.
///
/// Clock handling:
/// - clock advanced: the sequence restarts at 0
/// - clock stalled or moved backwards: the sequence keeps counting under the
///   newest timestamp already issued
/// - sequence exhausted: [`Self::generate`] sleeps and re-samples the clock
///   as configured by [`ClockRecovery`], then fails with
///   [`Error::ClockRegression`]
/// - clock before the epoch or beyond [`Layout::max_timestamp`]: every call
///   fails with [`Error::TimestampOutOfRange`]
///
/// # Example
///
/// ```
/// use ringflake::{Layout, LockSnowflakeGenerator, NodeIdentity, SystemClock};
///
/// let generator = LockSnowflakeGenerator::new(
///     NodeIdentity::new(5),
///     Layout::default(),
///     SystemClock::default(),
/// );
/// let a = generator.generate().unwrap();
/// let b = generator.generate().unwrap();
/// assert!(a < b);
/// assert_eq!(Layout::default().node(a), 5);
/// ```
pub struct LockSnowflakeGenerator<T, S = ThreadSleep>
where
    T: TimeSource,
    S: Sleep,
{
    state: Mutex<GeneratorState>,
    node: NodeIdentity,
    layout: Layout,
    recovery: ClockRecovery,
    time: T,
    sleeper: S,
}

impl<T> LockSnowflakeGenerator<T, ThreadSleep>
where
    T: TimeSource,
{
    /// Creates a generator for `node` that blocks the calling thread while
    /// waiting for a stalled clock.
    ///
    /// `node` is masked to the layout's node field.
    pub fn new(node: NodeIdentity, layout: Layout, time: T) -> Self {
        Self::from_components(-1, 0, node, layout, time, ThreadSleep)
    }
}

impl<T, S> LockSnowflakeGenerator<T, S>
where
    T: TimeSource,
    S: Sleep,
{
    /// Creates a generator from explicit state.
    ///
    /// Mostly useful in tests to start the generator at a given timestamp and
    /// sequence. Prefer [`LockSnowflakeGenerator::new`].
    pub fn from_components(
        last_timestamp: i64,
        sequence: u64,
        node: NodeIdentity,
        layout: Layout,
        time: T,
        sleeper: S,
    ) -> Self {
        Self {
            state: Mutex::new(GeneratorState {
                last_timestamp,
                sequence: sequence.min(layout.max_sequence()),
            }),
            node: layout.node_identity(node.get()),
            layout,
            recovery: ClockRecovery::default(),
            time,
            sleeper,
        }
    }

    /// Replaces the clock-recovery bound.
    #[must_use]
    pub fn with_recovery(mut self, recovery: ClockRecovery) -> Self {
        self.recovery = recovery;
        self
    }

    /// Replaces the sleep strategy used by [`Self::generate`].
    pub fn with_sleeper<S2: Sleep>(self, sleeper: S2) -> LockSnowflakeGenerator<T, S2> {
        LockSnowflakeGenerator {
            state: self.state,
            node: self.node,
            layout: self.layout,
            recovery: self.recovery,
            time: self.time,
            sleeper,
        }
    }

    pub fn node(&self) -> NodeIdentity {
        self.node
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn recovery(&self) -> ClockRecovery {
        self.recovery
    }

    /// Makes one generation attempt without sleeping.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TimestampOutOfRange`] if the clock reading does not
    /// fit the layout's timestamp field.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll(&self) -> Result<IdGenStatus> {
        let now = self.sample()?;
        let mut state = self.state.lock();
        Ok(match state.advance(now, self.layout.max_sequence()) {
            Some((ts, seq)) => IdGenStatus::Ready {
                id: self.pack(ts, seq),
            },
            None => IdGenStatus::Pending {
                last_timestamp: state.last_timestamp,
                now,
            },
        })
    }

    /// Generates the next ID.
    ///
    /// If the sequence for the current millisecond is exhausted, the lock is
    /// held while the generator sleeps and re-samples the clock, so
    /// concurrent callers queue behind it for at most
    /// [`ClockRecovery::max_wait`].
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegression`] if the clock has not moved past the last
    ///   issued timestamp after all recovery attempts. The generator state is
    ///   left as it was, so later calls keep failing until the clock recovers
    ///   rather than reissuing an ID.
    /// - [`Error::TimestampOutOfRange`] if the clock reads before the epoch or
    ///   past [`Layout::max_timestamp`]. Packing such a reading would wrap the
    ///   timestamp field and repeat earlier IDs.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate(&self) -> Result<SnowflakeId> {
        let now = self.sample()?;
        let mut state = self.state.lock();
        match state.advance(now, self.layout.max_sequence()) {
            Some((ts, seq)) => Ok(self.pack(ts, seq)),
            None => self.cold_wait_for_clock(&mut state, now),
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_wait_for_clock(&self, state: &mut GeneratorState, mut now: i64) -> Result<SnowflakeId> {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            last_timestamp = state.last_timestamp,
            now,
            "sequence exhausted, waiting for the clock to advance"
        );
        for _ in 0..self.recovery.attempts {
            self.sleeper.sleep(self.recovery.interval);
            now = self.sample()?;
            if let Some((ts, seq)) = state.advance(now, self.layout.max_sequence()) {
                return Ok(self.pack(ts, seq));
            }
        }
        #[cfg(feature = "tracing")]
        tracing::error!(
            last_timestamp = state.last_timestamp,
            now,
            "clock did not recover; refusing to issue an ID"
        );
        Err(Error::ClockRegression {
            last_timestamp: state.last_timestamp,
            now,
            attempts: self.recovery.attempts,
        })
    }

    /// Reads the clock, rejecting values the timestamp field cannot hold.
    fn sample(&self) -> Result<i64> {
        let now = self.time.current_millis();
        if self.layout.contains_timestamp(now) {
            return Ok(now);
        }
        #[cfg(feature = "tracing")]
        tracing::error!(
            now,
            max = self.layout.max_timestamp(),
            "clock reading does not fit the timestamp field"
        );
        Err(Error::TimestampOutOfRange {
            now,
            max: self.layout.max_timestamp(),
        })
    }

    fn pack(&self, timestamp: i64, sequence: u64) -> SnowflakeId {
        self.layout.compose(timestamp, self.node.get(), sequence)
    }
}

impl<T, S> SnowflakeGenerator for LockSnowflakeGenerator<T, S>
where
    T: TimeSource,
    S: Sleep,
{
    fn node(&self) -> NodeIdentity {
        self.node()
    }

    fn layout(&self) -> Layout {
        self.layout()
    }

    fn recovery(&self) -> ClockRecovery {
        self.recovery()
    }

    fn try_poll(&self) -> Result<IdGenStatus> {
        self.try_poll()
    }

    fn generate(&self) -> Result<SnowflakeId> {
        self.generate()
    }
}
