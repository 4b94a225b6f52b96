//! Start protocol timing

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Delays and bounds of the start protocol
///
/// Values are milliseconds so the YAML config stays readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncTiming {
    /// Wait after seeking both handles, before play
    pub settle_delay_ms: u64,
    /// Interval between state polls
    pub poll_interval_ms: u64,
    /// Polls per attempt after the initial check
    pub max_polls: u32,
    /// Wait after pausing a failed attempt
    pub backoff_delay_ms: u64,
    /// Attempts before giving up
    pub max_retries: u32,
}

impl Default for SyncTiming {
    fn default() -> Self {
        Self {
            settle_delay_ms: 100,
            poll_interval_ms: 100,
            max_polls: 50,
            backoff_delay_ms: 500,
            max_retries: 3,
        }
    }
}

impl SyncTiming {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn backoff_delay(&self) -> Duration {
        Duration::from_millis(self.backoff_delay_ms)
    }

    /// Longest time a start request can take before it fails
    pub fn worst_case(&self) -> Duration {
        let per_attempt = self.poll_interval() * self.max_polls + self.backoff_delay();
        self.settle_delay() + per_attempt * self.max_retries.max(1)
    }
}
