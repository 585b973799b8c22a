use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::TimeSource;

/// Default epoch: Friday, February 2, 2024 07:10:34.902 UTC.
pub const DEFAULT_EPOCH: Duration = Duration::from_millis(1_706_857_834_902);

/// Wall-clock time source measured from a custom epoch.
///
/// Reads [`SystemTime`] on every call, so NTP steps and manual clock changes
/// are visible to the generator. That is intentional: the generator detects
/// a clock that stops advancing and bounds how long it waits for it.
///
/// Instants before the epoch are reported as negative milliseconds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SystemClock {
    epoch: Duration,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::with_epoch(DEFAULT_EPOCH)
    }
}

impl SystemClock {
    /// `epoch` is the origin, as a [`Duration`] since 1970-01-01 UTC.
    pub const fn with_epoch(epoch: Duration) -> Self {
        Self { epoch }
    }

    pub const fn epoch(&self) -> Duration {
        self.epoch
    }
}

impl TimeSource for SystemClock {
    fn current_millis(&self) -> i64 {
        let epoch = UNIX_EPOCH + self.epoch;
        match SystemTime::now().duration_since(epoch) {
            Ok(elapsed) => elapsed.as_millis() as i64,
            Err(before) => -(before.duration().as_millis() as i64),
        }
    }
}
