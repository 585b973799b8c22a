use core::{future::Future, time::Duration};

/// Abstracts over how to sleep for a given [`Duration`] in async contexts.
pub trait SleepProvider {
    /// The returned future must be `Send` so the generating task can move
    /// between worker threads.
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send;
}

/// [`SleepProvider`] backed by Tokio's timer.
pub struct TokioSleep;

impl SleepProvider for TokioSleep {
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(dur)
    }
}

/// [`SleepProvider`] that yields to the Tokio scheduler instead of sleeping.
///
/// Useful in tests that drive the clock by hand. In production it turns the
/// recovery wait into a busy poll.
pub struct TokioYield;

impl SleepProvider for TokioYield {
    fn sleep_for(_dur: Duration) -> impl Future<Output = ()> + Send {
        tokio::task::yield_now()
    }
}
