use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use common::config::AppConfig;
use common::AppError;
use http::{header, HeaderMap, HeaderValue, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

#[derive(Debug, Error)]
pub enum GithubApiError {
    #[error("github api error: {status} for {endpoint}")]
    Http {
        status: StatusCode,
        endpoint: String,
    },
}

impl GithubApiError {
    pub fn status(status: StatusCode, endpoint: impl Into<String>) -> Self {
        Self::Http {
            status,
            endpoint: endpoint.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match *self {
            GithubApiError::Http { status, .. } => status,
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            GithubApiError::Http { endpoint, .. } => endpoint.as_str(),
        }
    }
}

/// Repository coordinates in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoName {
    pub owner: String,
    pub name: String,
}

impl RepoName {
    pub fn parse(input: &str) -> Result<Self> {
        let mut parts = input.trim().split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => Err(anyhow!(
                "invalid repository {input:?}, expected owner/repo"
            )),
        }
    }
}

impl FromStr for RepoName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Server-side filter for the issues listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum IssueState {
    #[default]
    All,
    Open,
    Closed,
}

impl IssueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueState::All => "all",
            IssueState::Open => "open",
            IssueState::Closed => "closed",
        }
    }
}

/// One page of raw listing results per call. Pages are 1-based.
#[async_trait]
pub trait GithubClient: Send + Sync {
    async fn list_commits(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Value>>;

    async fn list_issues(
        &self,
        owner: &str,
        repo: &str,
        state: IssueState,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Value>>;
}

pub struct RestGithubClient {
    http: reqwest::Client,
    base: Url,
}

impl RestGithubClient {
    /// Fails with [`AppError::MissingCredential`] before any client is built
    /// when no token is configured.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let token = config.github_token()?;
        let base = Url::parse(&config.github.api_url).map_err(AppError::http)?;
        Self::new(base, token, &config.github.user_agent)
    }

    pub fn new(base: Url, token: &str, user_agent: &str) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        let mut auth =
            HeaderValue::from_str(&format!("Bearer {token}")).map_err(AppError::http)?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static("2022-11-28"),
        );

        let http = reqwest::Client::builder()
            .user_agent(user_agent.to_string())
            .default_headers(headers)
            .build()
            .map_err(AppError::http)?;

        Ok(Self { http, base })
    }

    #[instrument(skip(self), fields(url = %url))]
    async fn get_json(&self, url: Url) -> Result<Value> {
        let endpoint = url.path().trim_start_matches('/').to_string();
        debug!(endpoint = %endpoint, "Dispatching GitHub request");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if status.is_success() {
            let body = response.bytes().await?;
            let value: Value = serde_json::from_slice(&body)?;
            Ok(value)
        } else {
            Err(GithubApiError::status(status, endpoint).into())
        }
    }

    async fn get_json_array(&self, url: Url) -> Result<Vec<Value>> {
        let value = self.get_json(url).await?;
        match value {
            Value::Array(items) => Ok(items),
            Value::Null => Ok(Vec::new()),
            _ => Err(anyhow!("expected array response")),
        }
    }

    fn join(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    fn with_query(url: &mut Url, params: &[(&str, String)]) {
        let mut query_pairs = url.query_pairs_mut();
        for (key, val) in params {
            query_pairs.append_pair(key, val);
        }
    }
}

#[async_trait]
impl GithubClient for RestGithubClient {
    async fn list_commits(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Value>> {
        let path = format!("repos/{owner}/{repo}/commits");
        let mut url = self.join(&path)?;
        let params = [
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        Self::with_query(&mut url, &params);
        self.get_json_array(url).await
    }

    async fn list_issues(
        &self,
        owner: &str,
        repo: &str,
        state: IssueState,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Value>> {
        let path = format!("repos/{owner}/{repo}/issues");
        let mut url = self.join(&path)?;
        let params = [
            ("state", state.as_str().to_string()),
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        Self::with_query(&mut url, &params);
        self.get_json_array(url).await
    }
}
