//! Repomon - session-scoped GitHub repository monitor
//!
//! Repomon watches a set of GitHub repositories per client session, re-polls
//! them on a fixed cadence, and pushes human-readable change notifications
//! to the owning session (or the shared broadcast topic).
//!
//! # Core Concepts
//!
//! - **One snapshot per watch**: the registry holds only the most recent
//!   observation per `(session, repository)` pair, nothing historical
//! - **Fetch outside the lock**: network calls never hold registry state;
//!   results are installed afterwards, re-checking the watch still exists
//! - **Failures are isolated**: a failing fetch is logged and skipped, it
//!   never aborts a poll cycle or removes a watch
//!
//! # Modules
//!
//! - [`domain`] - Snapshot, repository identity, and session types
//! - [`diff`] - Snapshot comparison and notification phrasing
//! - [`github`] - The `RepoFetcher` trait and the GitHub REST client
//! - [`notify`] - The `Notifier` delivery seam
//! - [`registry`] - Session-scoped watch registry
//! - [`scheduler`] - Fixed-cadence poll cycle
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod diff;
pub mod domain;
pub mod github;
pub mod notify;
pub mod registry;
pub mod scheduler;

// Re-export commonly used types
pub use config::{Config, GithubConfig, NotifyConfig};
pub use diff::{ChangeEvent, diff, watch_added_message};
pub use domain::{Destination, InvalidUrl, RepoId, RepoSnapshot, SessionId};
pub use github::{FetchError, GithubClient, RepoFetcher};
pub use notify::{ChannelNotifier, Notification, Notifier};
pub use registry::{SessionRegistry, WatchError};
pub use scheduler::{PollScheduler, SchedulerConfig};
