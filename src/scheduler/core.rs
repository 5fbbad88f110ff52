//! Poll scheduler: the fixed-cadence fetch/diff/notify cycle

use std::sync::Arc;

use futures::StreamExt;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use super::config::SchedulerConfig;
use crate::diff::diff;
use crate::domain::{RepoId, RepoSnapshot, SessionId};
use crate::github::RepoFetcher;
use crate::notify::Notifier;
use crate::registry::SessionRegistry;

/// Drives the fixed-cadence poll cycle over every registered watch
///
/// At most one cycle is in flight at a time: a timer tick that fires while
/// a cycle is still running is skipped, not queued, so slow fetches never
/// build a backlog of pending cycles.
pub struct PollScheduler {
    registry: Arc<SessionRegistry>,
    fetcher: Arc<dyn RepoFetcher>,
    notifier: Arc<dyn Notifier>,
    config: SchedulerConfig,
}

impl PollScheduler {
    pub fn new(
        registry: Arc<SessionRegistry>,
        fetcher: Arc<dyn RepoFetcher>,
        notifier: Arc<dyn Notifier>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            registry,
            fetcher,
            notifier,
            config,
        }
    }

    /// Run the scheduler until the task is dropped
    ///
    /// Nothing inside a cycle is fatal; the loop survives arbitrarily many
    /// consecutive fetch failures.
    pub async fn run(self) {
        info!(interval_secs = self.config.poll_interval_secs, "PollScheduler started");

        let mut ticker = interval(self.config.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick of a tokio interval completes immediately; consume
        // it so the first cycle runs one full period after startup.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            self.run_cycle().await;
        }
    }

    /// Run a single poll cycle over a consistent view of the registry
    pub async fn run_cycle(&self) {
        let entries = self.registry.snapshot_all().await;
        if entries.is_empty() {
            debug!("PollScheduler::run_cycle: nothing watched, skipping");
            return;
        }

        debug!(watches = entries.len(), "PollScheduler::run_cycle: starting");

        futures::stream::iter(entries)
            .for_each_concurrent(self.config.max_parallel_fetches, |(session, id, old)| {
                self.poll_one(session, id, old)
            })
            .await;

        debug!("PollScheduler::run_cycle: complete");
    }

    /// Poll one watch in isolation
    ///
    /// A failure here never affects the rest of the cycle: the stored
    /// snapshot is kept unchanged and the watch stays alive for the next
    /// cycle.
    async fn poll_one(&self, session: SessionId, id: RepoId, old: RepoSnapshot) {
        let new = match self.fetcher.fetch(&id).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(%session, %id, error = %e, "poll fetch failed, keeping previous snapshot");
                return;
            }
        };

        let events = diff(&old, &new);
        if !events.is_empty() {
            debug!(%session, %id, events = events.len(), "PollScheduler::poll_one: changes detected");
            let dest = session.destination();
            for event in &events {
                self.notifier.send(&dest, &event.format(&new.full_name, &dest)).await;
            }
        }

        // Install the fresh snapshot even when nothing changed, so staleness
        // never compounds. A watch removed mid-fetch discards the result.
        if !self.registry.commit_poll(&session, &id, new).await {
            debug!(%session, %id, "PollScheduler::poll_one: watch removed mid-fetch, result dropped");
        }
    }
}
