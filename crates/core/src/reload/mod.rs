//! Hot reload of property files.
//!
//! Responsibilities:
//! - Fingerprint the files a consumer depends on and detect on-disk changes.
//! - Reload the owning engine and notify the owner when a change is seen.
//! - Run asynchronous checks on one background scheduler thread.
//!
//! Does NOT handle:
//! - Re-merging a consumer's properties (the owner callback does that).
//! - Cross-process coordination beyond filesystem polling.
//!
//! Invariants:
//! - Synchronous and asynchronous modes share `ReloadMonitor::check_and_reload`.
//! - The watch is re-armed with fresh fingerprints right after each reload,
//!   so one change set triggers at most one reload.

mod monitor;
mod scheduler;
mod watch;

pub use monitor::ReloadMonitor;
pub use scheduler::ReloadScheduler;
pub use watch::{WatchState, tracked_paths};

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_HOT_RELOAD_INTERVAL, HOT_RELOAD_INTERVAL_VAR, MIN_HOT_RELOAD_INTERVAL,
};
use crate::error::{KrauseningError, Result};
use crate::loader::env_var_or_none;

/// When reload checks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReloadMode {
    /// Inline, on the reading thread, before every read.
    Sync,
    /// On the background scheduler, once per interval.
    Async,
}

/// A consumer's hot-reload declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotReload {
    pub mode: ReloadMode,
    /// Time between asynchronous checks. Ignored in synchronous mode.
    pub interval: Duration,
}

impl HotReload {
    /// Check before every read.
    pub fn sync() -> Self {
        Self {
            mode: ReloadMode::Sync,
            interval: DEFAULT_HOT_RELOAD_INTERVAL,
        }
    }

    /// Check in the background every `interval`, clamped to a 10ms floor.
    pub fn asynchronous(interval: Duration) -> Self {
        Self {
            mode: ReloadMode::Async,
            interval: interval.max(MIN_HOT_RELOAD_INTERVAL),
        }
    }

    /// Asynchronous checks at the interval from `KRAUSENING_RELOAD_INTERVAL_MS`,
    /// or the 5 second default when it is unset.
    pub fn asynchronous_from_env() -> Result<Self> {
        Ok(Self::asynchronous(default_interval()?))
    }
}

/// The asynchronous interval configured in the environment, if any.
pub fn default_interval() -> Result<Duration> {
    match env_var_or_none(HOT_RELOAD_INTERVAL_VAR) {
        None => Ok(DEFAULT_HOT_RELOAD_INTERVAL),
        Some(raw) => {
            let millis: u64 = raw.parse().map_err(|_| KrauseningError::InvalidValue {
                var: HOT_RELOAD_INTERVAL_VAR.to_string(),
                message: "must be a number of milliseconds".to_string(),
            })?;
            Ok(Duration::from_millis(millis))
        }
    }
}
