//! GitHub profile statistics proxy
//!
//! Reads the public profile and owned repositories of one account and folds
//! them into the numbers the site displays. The token, when set, only raises
//! the upstream rate limit; it is never exposed to the browser.
//!
//! # API Reference
//! - `GET /users/{user}`
//! - `GET /users/{user}/repos?per_page=100&type=owner` (first page only)

use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// GitHub rejects requests without a User-Agent
const USER_AGENT: &str = concat!("folio-api/", env!("CARGO_PKG_VERSION"));

/// Languages reported in `top_languages`
pub const TOP_LANGUAGES: usize = 5;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GitHub request failed: {0}")]
    Network(String),

    #[error("GitHub returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse GitHub response: {0}")]
    Parse(String),
}

#[derive(Debug, Deserialize)]
pub struct GithubUser {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub html_url: Option<String>,
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
}

#[derive(Debug, Deserialize)]
pub struct GithubRepo {
    pub name: String,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageCount {
    pub name: String,
    pub repos: u64,
}

/// Aggregated profile numbers served to the site
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubStats {
    pub username: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub profile_url: Option<String>,
    pub public_repos: u64,
    pub followers: u64,
    pub following: u64,
    pub total_stars: u64,
    pub total_forks: u64,
    pub top_languages: Vec<LanguageCount>,
}

/// Fold a profile and its repositories into [`GithubStats`]
///
/// Forked repositories do not count toward stars, forks or languages.
pub fn aggregate(user: GithubUser, repos: &[GithubRepo]) -> GithubStats {
    let owned = repos.iter().filter(|r| !r.fork);

    let mut total_stars = 0;
    let mut total_forks = 0;
    let mut languages: HashMap<&str, u64> = HashMap::new();
    for repo in owned {
        total_stars += repo.stargazers_count;
        total_forks += repo.forks_count;
        if let Some(lang) = repo.language.as_deref() {
            *languages.entry(lang).or_default() += 1;
        }
    }

    let mut top_languages: Vec<LanguageCount> = languages
        .into_iter()
        .map(|(name, repos)| LanguageCount {
            name: name.to_string(),
            repos,
        })
        .collect();
    top_languages.sort_by(|a, b| b.repos.cmp(&a.repos).then_with(|| a.name.cmp(&b.name)));
    top_languages.truncate(TOP_LANGUAGES);

    GithubStats {
        username: user.login,
        name: user.name,
        avatar_url: user.avatar_url,
        profile_url: user.html_url,
        public_repos: user.public_repos,
        followers: user.followers,
        following: user.following,
        total_stars,
        total_forks,
        top_languages,
    }
}

/// Read-only GitHub REST client for one account
#[derive(Clone)]
pub struct GithubClient {
    http_client: Client,
    api_base: String,
    username: String,
}

impl GithubClient {
    pub fn new(api_base: &str, username: &str, token: Option<&str>) -> Result<Self, GithubError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::USER_AGENT, header::HeaderValue::from_static(USER_AGENT));
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        if let Some(token) = token {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| GithubError::Network(format!("Invalid GitHub token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let http_client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|e| GithubError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_base: api_base.trim_end_matches('/').to_string(),
            username: username.to_string(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, GithubError> {
        let url = format!("{}{}", self.api_base, path);
        debug!(url = %url, "GitHub request");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| GithubError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GithubError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| GithubError::Parse(e.to_string()))
    }

    /// Fetch the profile and repositories and aggregate them
    pub async fn stats(&self) -> Result<GithubStats, GithubError> {
        let user: GithubUser = self.get_json(&format!("/users/{}", self.username)).await?;
        let repos: Vec<GithubRepo> = self
            .get_json(&format!("/users/{}/repos?per_page=100&type=owner", self.username))
            .await?;
        Ok(aggregate(user, &repos))
    }
}
