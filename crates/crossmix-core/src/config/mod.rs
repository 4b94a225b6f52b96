//! Crossmix configuration
//!
//! One YAML file holds the start protocol timing, the fader label
//! behavior and the location of the saved-mix store. Every section is
//! optional; anything left out takes its default.
//!
//! ```yaml
//! sync:
//!   settle_delay_ms: 100
//!   poll_interval_ms: 100
//!   max_polls: 50
//!   backoff_delay_ms: 500
//!   max_retries: 3
//! labels:
//!   hide_delay_ms: 1000
//! store_path: /home/me/.local/share/crossmix/mixes.yaml
//! ```

mod io;
mod paths;

pub use io::{load_config, save_config};
pub use paths::{default_config_path, default_store_path};

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::sync::SyncTiming;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossmixConfig {
    pub sync: SyncTiming,
    pub labels: LabelConfig,
    /// Saved-mix store; `None` means the platform data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
}

impl CrossmixConfig {
    /// Store location, resolving the platform default
    pub fn store_path(&self) -> PathBuf {
        self.store_path.clone().unwrap_or_else(default_store_path)
    }
}

/// Fader percentage label behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// How long labels stay up after the last fader interaction
    pub hide_delay_ms: u64,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self { hide_delay_ms: 1000 }
    }
}

impl LabelConfig {
    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_delay_ms)
    }
}
