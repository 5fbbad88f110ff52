//! Registry of watched repositories per client session

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use crate::diff::watch_added_message;
use crate::domain::{InvalidUrl, RepoId, RepoSnapshot, SessionId};
use crate::github::{FetchError, RepoFetcher};
use crate::notify::Notifier;

/// Errors surfaced to a client trying to create a watch
#[derive(Debug, Error)]
pub enum WatchError {
    #[error(transparent)]
    InvalidUrl(#[from] InvalidUrl),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

type WatchMap = HashMap<SessionId, HashMap<RepoId, RepoSnapshot>>;

/// Shared registry mapping sessions to their watched repositories
///
/// One instance is created at startup and injected into every component
/// that needs it; it is never a process global and holds nothing across
/// restarts. Invariant: a session entry exists iff it has at least one
/// watch, so every path that can empty an inner map prunes the entry
/// immediately.
pub struct SessionRegistry {
    fetcher: Arc<dyn RepoFetcher>,
    notifier: Arc<dyn Notifier>,
    watches: Mutex<WatchMap>,
}

impl SessionRegistry {
    pub fn new(fetcher: Arc<dyn RepoFetcher>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            fetcher,
            notifier,
            watches: Mutex::new(HashMap::new()),
        }
    }

    /// Create a watch for `(session, url)` and return the initial snapshot
    ///
    /// The URL is normalized and the snapshot fetched before any mutation,
    /// so a failed fetch leaves the registry untouched and no phantom entry
    /// appears. The fetch runs without the registry lock held. On success,
    /// exactly one watch-added confirmation is sent to the session.
    pub async fn add_watch(&self, session: &SessionId, url: &str) -> Result<RepoSnapshot, WatchError> {
        let id = RepoId::parse(url)?;
        debug!(%session, %id, "SessionRegistry::add_watch: fetching initial snapshot");

        let snapshot = self.fetcher.fetch(&id).await?;

        {
            let mut watches = self.watches.lock().await;
            watches.entry(session.clone()).or_default().insert(id.clone(), snapshot.clone());
        }
        debug!(%session, %id, "SessionRegistry::add_watch: watch stored");

        self.notifier
            .send(&session.destination(), &watch_added_message(&snapshot.full_name))
            .await;

        Ok(snapshot)
    }

    /// Remove one watch; removing an absent watch is a no-op
    pub async fn remove_watch(&self, session: &SessionId, id: &RepoId) {
        let mut watches = self.watches.lock().await;
        if let Some(repos) = watches.get_mut(session) {
            repos.remove(id);
            if repos.is_empty() {
                watches.remove(session);
            }
        }
        debug!(%session, %id, "SessionRegistry::remove_watch: done");
    }

    /// Drop every watch belonging to a session in one step; idempotent
    pub async fn remove_session(&self, session: &SessionId) {
        let removed = self.watches.lock().await.remove(session);
        debug!(%session, removed = removed.is_some(), "SessionRegistry::remove_session: done");
    }

    /// Consistent point-in-time view of every watch
    ///
    /// Taken under a single lock acquisition, so a session being removed
    /// concurrently is either fully present or fully absent in the result,
    /// never partial.
    pub async fn snapshot_all(&self) -> Vec<(SessionId, RepoId, RepoSnapshot)> {
        let watches = self.watches.lock().await;
        watches
            .iter()
            .flat_map(|(session, repos)| {
                repos
                    .iter()
                    .map(move |(id, snapshot)| (session.clone(), id.clone(), snapshot.clone()))
            })
            .collect()
    }

    /// Install a polled snapshot, but only if the watch still exists
    ///
    /// Returns false when the watch was removed while the fetch was in
    /// flight; the late result is discarded rather than resurrecting the
    /// removed key.
    pub async fn commit_poll(&self, session: &SessionId, id: &RepoId, snapshot: RepoSnapshot) -> bool {
        let mut watches = self.watches.lock().await;
        match watches.get_mut(session).and_then(|repos| repos.get_mut(id)) {
            Some(slot) => {
                *slot = snapshot;
                true
            }
            None => {
                debug!(%session, %id, "SessionRegistry::commit_poll: watch gone, discarding");
                false
            }
        }
    }

    /// Current snapshot for one watch, if present
    pub async fn get(&self, session: &SessionId, id: &RepoId) -> Option<RepoSnapshot> {
        self.watches.lock().await.get(session).and_then(|repos| repos.get(id)).cloned()
    }

    /// Number of watches across all sessions
    pub async fn watch_count(&self) -> usize {
        self.watches.lock().await.values().map(HashMap::len).sum()
    }

    /// Number of sessions with at least one watch
    pub async fn session_count(&self) -> usize {
        self.watches.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::testing::{ScriptedFetcher, snapshot};
    use crate::notify::RecordingNotifier;

    fn id(s: &str) -> RepoId {
        RepoId::parse(s).unwrap()
    }

    fn registry() -> (Arc<ScriptedFetcher>, Arc<RecordingNotifier>, SessionRegistry) {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let registry = SessionRegistry::new(fetcher.clone(), notifier.clone());
        (fetcher, notifier, registry)
    }

    #[tokio::test]
    async fn test_add_watch_stores_snapshot_and_confirms_once() {
        let (fetcher, notifier, registry) = registry();
        let session = SessionId::new("abc123");
        let fetched = snapshot("acme/widgets", 10, 2, 1, "T1");
        fetcher.push(&id("acme/widgets"), Ok(fetched.clone())).await;

        let stored = registry.add_watch(&session, "https://github.com/acme/widgets").await.unwrap();

        assert_eq!(stored, fetched);
        assert_eq!(registry.get(&session, &id("acme/widgets")).await, Some(fetched));
        assert_eq!(registry.watch_count().await, 1);
        assert_eq!(registry.session_count().await, 1);

        let sent = notifier.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].dest, session.destination());
        assert_eq!(sent[0].text, "Now monitoring: acme/widgets");
    }

    #[tokio::test]
    async fn test_add_watch_invalid_url_does_not_mutate() {
        let (_fetcher, notifier, registry) = registry();
        let session = SessionId::new("abc123");

        let err = registry.add_watch(&session, "https://github.com/acme").await.unwrap_err();

        assert!(matches!(err, WatchError::InvalidUrl(_)));
        assert_eq!(err.to_string(), "invalid repository URL format");
        assert_eq!(registry.session_count().await, 0);
        assert!(notifier.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_watch_fetch_failure_creates_no_phantom_entry() {
        let (fetcher, notifier, registry) = registry();
        let session = SessionId::new("abc123");
        fetcher
            .push(
                &id("acme/widgets"),
                Err(FetchError::Status {
                    status: 404,
                    id: id("acme/widgets"),
                }),
            )
            .await;

        let err = registry.add_watch(&session, "acme/widgets").await.unwrap_err();

        assert!(matches!(err, WatchError::Fetch(_)));
        assert_eq!(registry.watch_count().await, 0);
        assert_eq!(registry.session_count().await, 0);
        assert!(notifier.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_remove_watch_prunes_empty_session() {
        let (fetcher, _notifier, registry) = registry();
        let session = SessionId::new("abc123");
        fetcher.push(&id("acme/widgets"), Ok(snapshot("acme/widgets", 10, 2, 1, "T1"))).await;
        registry.add_watch(&session, "acme/widgets").await.unwrap();

        registry.remove_watch(&session, &id("acme/widgets")).await;

        assert_eq!(registry.watch_count().await, 0);
        assert_eq!(registry.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_remove_watch_absent_is_noop() {
        let (fetcher, _notifier, registry) = registry();
        let session = SessionId::new("abc123");
        fetcher.push(&id("acme/widgets"), Ok(snapshot("acme/widgets", 10, 2, 1, "T1"))).await;
        registry.add_watch(&session, "acme/widgets").await.unwrap();

        registry.remove_watch(&session, &id("other/repo")).await;
        registry.remove_watch(&SessionId::new("nobody"), &id("acme/widgets")).await;

        assert_eq!(registry.watch_count().await, 1);
        assert_eq!(registry.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_remove_session_drops_all_watches_and_is_idempotent() {
        let (fetcher, _notifier, registry) = registry();
        let session = SessionId::new("abc123");
        fetcher.push(&id("acme/widgets"), Ok(snapshot("acme/widgets", 10, 2, 1, "T1"))).await;
        fetcher.push(&id("acme/gears"), Ok(snapshot("acme/gears", 5, 1, 0, "T1"))).await;
        registry.add_watch(&session, "acme/widgets").await.unwrap();
        registry.add_watch(&session, "acme/gears").await.unwrap();

        registry.remove_session(&session).await;
        assert_eq!(registry.watch_count().await, 0);
        assert_eq!(registry.session_count().await, 0);

        // Second removal is a no-op, not an error
        registry.remove_session(&session).await;
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let (fetcher, _notifier, registry) = registry();
        let alpha = SessionId::new("alpha");
        let beta = SessionId::new("beta");
        fetcher.push(&id("acme/widgets"), Ok(snapshot("acme/widgets", 10, 2, 1, "T1"))).await;
        fetcher.push(&id("acme/widgets"), Ok(snapshot("acme/widgets", 10, 2, 1, "T1"))).await;
        registry.add_watch(&alpha, "acme/widgets").await.unwrap();
        registry.add_watch(&beta, "acme/widgets").await.unwrap();

        registry.remove_session(&alpha).await;

        assert!(registry.get(&alpha, &id("acme/widgets")).await.is_none());
        assert!(registry.get(&beta, &id("acme/widgets")).await.is_some());
        assert_eq!(registry.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_commit_poll_replaces_live_watch() {
        let (fetcher, _notifier, registry) = registry();
        let session = SessionId::new("abc123");
        fetcher.push(&id("acme/widgets"), Ok(snapshot("acme/widgets", 10, 2, 1, "T1"))).await;
        registry.add_watch(&session, "acme/widgets").await.unwrap();

        let newer = snapshot("acme/widgets", 12, 2, 1, "T2");
        assert!(registry.commit_poll(&session, &id("acme/widgets"), newer.clone()).await);
        assert_eq!(registry.get(&session, &id("acme/widgets")).await, Some(newer));
    }

    #[tokio::test]
    async fn test_commit_poll_discards_late_result_after_removal() {
        let (fetcher, _notifier, registry) = registry();
        let session = SessionId::new("abc123");
        fetcher.push(&id("acme/widgets"), Ok(snapshot("acme/widgets", 10, 2, 1, "T1"))).await;
        registry.add_watch(&session, "acme/widgets").await.unwrap();

        // Watch removed while a poll fetch is in flight
        registry.remove_watch(&session, &id("acme/widgets")).await;

        let late = snapshot("acme/widgets", 12, 2, 1, "T2");
        assert!(!registry.commit_poll(&session, &id("acme/widgets"), late).await);
        assert!(registry.get(&session, &id("acme/widgets")).await.is_none());
        assert_eq!(registry.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_broadcast_confirmation_goes_to_broadcast_topic() {
        let (fetcher, notifier, registry) = registry();
        fetcher.push(&id("acme/widgets"), Ok(snapshot("acme/widgets", 10, 2, 1, "T1"))).await;

        registry.add_watch(&SessionId::broadcast(), "acme/widgets").await.unwrap();

        let sent = notifier.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].dest, crate::domain::Destination::Broadcast);
        assert_eq!(sent[0].text, "Now monitoring: acme/widgets");
    }
}
