use core::future::Future;

use super::SleepProvider;
use crate::{Error, IdGenStatus, Result, SnowflakeGenerator, SnowflakeId};

/// Extension trait for generating Snowflake IDs without blocking a runtime
/// worker.
///
/// Unlike [`SnowflakeGenerator::generate`], the generator lock is released
/// between recovery attempts, so other tasks keep making progress while one
/// waits. Dropping the future abandons the wait without touching generator
/// state.
pub trait SnowflakeGeneratorAsyncExt {
    /// Returns a future that resolves to the next Snowflake ID.
    ///
    /// When the sequence is exhausted the future sleeps for the generator's
    /// [`ClockRecovery::interval`] using `S` and tries again, at most
    /// [`ClockRecovery::attempts`] times.
    ///
    /// # Errors
    ///
    /// Resolves to [`Error::ClockRegression`] if the clock never advances, or
    /// to [`Error::TimestampOutOfRange`] if it does not fit the layout.
    ///
    /// [`ClockRecovery::interval`]: crate::ClockRecovery::interval
    /// [`ClockRecovery::attempts`]: crate::ClockRecovery::attempts
    fn generate_async<S>(&self) -> impl Future<Output = Result<SnowflakeId>> + Send
    where
        S: SleepProvider;
}

impl<G> SnowflakeGeneratorAsyncExt for G
where
    G: SnowflakeGenerator + Sync,
{
    fn generate_async<S>(&self) -> impl Future<Output = Result<SnowflakeId>> + Send
    where
        S: SleepProvider,
    {
        async move {
            let recovery = self.recovery();
            let mut attempt = 0;
            loop {
                match self.try_poll()? {
                    IdGenStatus::Ready { id } => return Ok(id),
                    IdGenStatus::Pending {
                        last_timestamp,
                        now,
                    } => {
                        if attempt == recovery.attempts {
                            return Err(Error::ClockRegression {
                                last_timestamp,
                                now,
                                attempts: recovery.attempts,
                            });
                        }
                    }
                }
                attempt += 1;
                S::sleep_for(recovery.interval).await;
            }
        }
    }
}
