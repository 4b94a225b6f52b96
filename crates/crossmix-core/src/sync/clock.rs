//! Time source for the start protocol's waits

use std::future::Future;
use std::time::Duration;

/// Something that can wait
///
/// Production code uses [`TokioClock`]. Tests run it on tokio's paused
/// clock, so a full retry cycle completes instantly and deterministically.
pub trait Clock: Send + Sync {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Clock backed by `tokio::time`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}
