//! GitHub REST API client

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;
use tracing::debug;

use super::{FetchError, RepoFetcher};
use crate::config::GithubConfig;
use crate::domain::{RepoId, RepoSnapshot};

/// Wire shape of the repository endpoint, trimmed to the fields we track
#[derive(Debug, Deserialize)]
struct RepoBody {
    full_name: String,
    description: Option<String>,
    stargazers_count: u64,
    forks_count: u64,
    open_issues_count: u64,
    watchers_count: u64,
    language: Option<String>,
    updated_at: String,
    html_url: String,
}

impl From<RepoBody> for RepoSnapshot {
    fn from(body: RepoBody) -> Self {
        Self {
            full_name: body.full_name,
            description: body.description,
            stars: body.stargazers_count,
            forks: body.forks_count,
            open_issues: body.open_issues_count,
            watchers: body.watchers_count,
            language: body.language,
            updated_at: body.updated_at,
            url: body.html_url,
        }
    }
}

/// Client for the GitHub REST API repository endpoint
pub struct GithubClient {
    http: Client,
    api_base: String,
    user_agent: String,
}

impl GithubClient {
    /// Build a client from configuration
    ///
    /// The per-request timeout comes from config so one slow repository
    /// cannot stall a poll cycle indefinitely.
    pub fn from_config(config: &GithubConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(FetchError::Network)?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
        })
    }
}

#[async_trait]
impl RepoFetcher for GithubClient {
    async fn fetch(&self, id: &RepoId) -> Result<RepoSnapshot, FetchError> {
        let url = format!("{}/repos/{}/{}", self.api_base, id.owner, id.repo);
        debug!(%id, %url, "GithubClient::fetch: requesting");

        // GitHub rejects requests without a User-Agent
        let response = self
            .http
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                id: id.clone(),
            });
        }

        let body: RepoBody = response.json().await.map_err(|e| FetchError::MalformedBody(e.to_string()))?;

        debug!(%id, stars = body.stargazers_count, "GithubClient::fetch: snapshot received");
        Ok(body.into())
    }
}
