//! Repository identity and URL normalization

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a repository URL cannot be normalized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid repository URL format")]
pub struct InvalidUrl {
    /// The input that failed to normalize
    pub input: String,
}

/// Canonical `owner/repo` identity of a GitHub repository
///
/// This is the normalized form every watch is keyed on; two URL spellings
/// of the same repository map to the same `RepoId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl RepoId {
    /// Normalize a repository URL into its canonical `owner/repo` form
    ///
    /// Accepts `https://github.com/owner/repo`, the `http` variant, and a
    /// bare `owner/repo` path. A trailing `.git` on the repo segment is
    /// stripped; path segments past the first two are ignored.
    pub fn parse(input: &str) -> Result<Self, InvalidUrl> {
        let trimmed = input.trim();
        let path = trimmed
            .strip_prefix("https://github.com/")
            .or_else(|| trimmed.strip_prefix("http://github.com/"))
            .unwrap_or(trimmed);

        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let (Some(owner), Some(repo)) = (segments.next(), segments.next()) else {
            return Err(InvalidUrl {
                input: input.to_string(),
            });
        };

        let repo = repo.strip_suffix(".git").unwrap_or(repo);
        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
