//! GitHub repository snapshot fetching

mod client;
mod error;

pub use client::GithubClient;
pub use error::FetchError;

use async_trait::async_trait;

use crate::domain::{RepoId, RepoSnapshot};

/// Source of point-in-time repository snapshots
///
/// The registry and scheduler depend on this trait rather than the live
/// client, so tests can substitute a scripted fetcher. A returned snapshot
/// is always fully populated; partial results are not possible.
#[async_trait]
pub trait RepoFetcher: Send + Sync {
    async fn fetch(&self, id: &RepoId) -> Result<RepoSnapshot, FetchError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::{HashMap, VecDeque};

    use tokio::sync::Mutex;

    use super::*;

    /// Fetcher that replays scripted results per repository, in order
    pub(crate) struct ScriptedFetcher {
        scripts: Mutex<HashMap<RepoId, VecDeque<Result<RepoSnapshot, FetchError>>>>,
    }

    impl ScriptedFetcher {
        pub(crate) fn new() -> Self {
            Self {
                scripts: Mutex::new(HashMap::new()),
            }
        }

        pub(crate) async fn push(&self, id: &RepoId, result: Result<RepoSnapshot, FetchError>) {
            self.scripts.lock().await.entry(id.clone()).or_default().push_back(result);
        }
    }

    #[async_trait]
    impl RepoFetcher for ScriptedFetcher {
        async fn fetch(&self, id: &RepoId) -> Result<RepoSnapshot, FetchError> {
            self.scripts
                .lock()
                .await
                .get_mut(id)
                .and_then(|queue| queue.pop_front())
                .unwrap_or_else(|| Err(FetchError::MalformedBody(format!("no scripted result for {id}"))))
        }
    }

    pub(crate) fn snapshot(full_name: &str, stars: u64, forks: u64, issues: u64, updated_at: &str) -> RepoSnapshot {
        RepoSnapshot {
            full_name: full_name.to_string(),
            description: None,
            stars,
            forks,
            open_issues: issues,
            watchers: stars,
            language: Some("Rust".to_string()),
            updated_at: updated_at.to_string(),
            url: format!("https://github.com/{full_name}"),
        }
    }
}
