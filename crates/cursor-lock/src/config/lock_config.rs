use crate::config::{default_tick_ms, default_unlock_wait_ms};

use std::time::Duration;

use cursor_lock_core::LockTiming;
use serde::{Deserialize, Serialize};

/// Clamp loop timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockConfig {
    /// Delay between clamp re-assertions, in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Upper bound on how long a force unlock waits for the loop to exit.
    #[serde(default = "default_unlock_wait_ms")]
    pub unlock_wait_ms: u64,
}

impl LockConfig {
    /// Timing handed to the lock machine. A zero tick is raised to 1ms so the
    /// loop never spins.
    pub fn timing(&self) -> LockTiming {
        LockTiming {
            tick: Duration::from_millis(self.tick_ms.max(1)),
            unlock_wait: Duration::from_millis(self.unlock_wait_ms),
        }
    }
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            unlock_wait_ms: default_unlock_wait_ms(),
        }
    }
}
