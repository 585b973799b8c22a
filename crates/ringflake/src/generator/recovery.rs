use core::time::Duration;

/// How long the generator waits for a stalled clock before giving up.
///
/// When every sequence value of the current millisecond has been handed out
/// and the clock has not moved on, the generator sleeps `interval` and
/// re-samples the clock, at most `attempts` times. The worst-case stall of a
/// single call is therefore `interval * attempts`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ClockRecovery {
    pub interval: Duration,
    pub attempts: u32,
}

impl Default for ClockRecovery {
    /// One second between samples, three samples.
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            attempts: 3,
        }
    }
}

impl ClockRecovery {
    pub const fn new(interval: Duration, attempts: u32) -> Self {
        Self { interval, attempts }
    }

    /// Upper bound on the time a single call may spend waiting.
    pub fn max_wait(&self) -> Duration {
        self.interval.saturating_mul(self.attempts)
    }
}

/// Blocking sleep used by [`LockSnowflakeGenerator::generate`].
///
/// [`LockSnowflakeGenerator::generate`]: crate::LockSnowflakeGenerator::generate
pub trait Sleep {
    fn sleep(&self, dur: Duration);
}

/// [`Sleep`] backed by [`std::thread::sleep`].
#[derive(Copy, Clone, Debug, Default)]
pub struct ThreadSleep;

impl Sleep for ThreadSleep {
    fn sleep(&self, dur: Duration) {
        std::thread::sleep(dur);
    }
}

impl<S: Sleep + ?Sized> Sleep for &S {
    fn sleep(&self, dur: Duration) {
        (**self).sleep(dur);
    }
}

impl<S: Sleep + ?Sized> Sleep for std::sync::Arc<S> {
    fn sleep(&self, dur: Duration) {
        (**self).sleep(dur);
    }
}
