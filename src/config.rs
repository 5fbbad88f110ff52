//! Configuration types and loading

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::scheduler::SchedulerConfig;

/// Environment variable overriding the poll interval in seconds
///
/// This is the one runtime tunable exposed outside the config file.
pub const POLL_INTERVAL_ENV: &str = "REPOMON_POLL_INTERVAL_SECS";

/// Main repomon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub API access
    pub github: GithubConfig,

    /// Poll scheduler tuning
    pub scheduler: SchedulerConfig,

    /// Notification queue sizing
    pub notify: NotifyConfig,
}

impl Config {
    /// Load configuration with fallback chain
    ///
    /// Explicit path → `.repomon.yml` → `~/.config/repomon/repomon.yml` →
    /// defaults, then environment overrides on top.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Self::load_file_chain(config_path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn load_file_chain(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, it must load
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .repomon.yml
        let local_config = PathBuf::from(".repomon.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/repomon/repomon.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("repomon").join("repomon.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var(POLL_INTERVAL_ENV) {
            match value.parse::<u64>() {
                Ok(secs) if secs > 0 => {
                    tracing::info!(secs, "Poll interval overridden from environment");
                    self.scheduler.poll_interval_secs = secs;
                }
                _ => {
                    tracing::warn!(%value, "Ignoring invalid REPOMON_POLL_INTERVAL_SECS");
                }
            }
        }
    }
}

/// GitHub API client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Base URL of the GitHub REST API
    #[serde(rename = "api-base", default = "default_api_base")]
    pub api_base: String,

    /// User-Agent header (GitHub rejects requests without one)
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in milliseconds
    #[serde(rename = "timeout-ms", default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_user_agent() -> String {
    concat!("repomon/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl GithubConfig {
    /// Request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Notification queue configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Capacity of the transport queue
    #[serde(rename = "queue-capacity", default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_queue_capacity() -> usize {
    1024
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
        }
    }
}
