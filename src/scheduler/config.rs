//! Scheduler configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the PollScheduler
///
/// The cadence is fixed at startup (config file or environment override);
/// clients cannot change it at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Seconds between poll cycles
    #[serde(rename = "poll-interval-secs", default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Maximum concurrent fetches within one cycle
    #[serde(rename = "max-parallel-fetches", default = "default_max_parallel_fetches")]
    pub max_parallel_fetches: usize,
}

fn default_poll_interval_secs() -> u64 {
    60
}

fn default_max_parallel_fetches() -> usize {
    4
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            max_parallel_fetches: default_max_parallel_fetches(),
        }
    }
}

impl SchedulerConfig {
    /// Poll interval as a Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}
