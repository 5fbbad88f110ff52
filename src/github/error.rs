//! Fetch error types

use thiserror::Error;

use crate::domain::RepoId;

/// Errors from fetching a repository snapshot
///
/// Callers treat these as opaque and uniform; the variants exist for
/// logging fidelity, not for branching.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("GitHub API returned {status} for {id}")]
    Status { status: u16, id: RepoId },

    #[error("malformed response body: {0}")]
    MalformedBody(String),
}
