//! Reqwest-backed GitHub source adapter.
//!
//! This adapter owns transport details only: URL construction, request
//! headers, timeout and HTTP error mapping, and JSON decoding into domain
//! records. Each lookup reads the first page the API returns.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::{GitHubFollowerDto, GitHubRepoDto, GitHubUserDto};
use crate::domain::ports::{ExternalProfileSource, ExternalProfileSourceError};
use crate::domain::{ExternalFollower, ExternalRepo, ExternalUserId, ExternalUserProfile};

const GITHUB_JSON_MEDIA_TYPE: &str = "application/vnd.github+json";

/// GitHub source adapter issuing `GET {base}/users/{login}[/followers|/repos]`.
pub struct GitHubHttpSource {
    client: Client,
    base_url: Url,
    user_agent: String,
}

impl GitHubHttpSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    /// ```rust,ignore
    /// let source = GitHubHttpSource::new(base_url, timeout, "user-service/0.1");
    /// assert!(source.is_ok() || source.is_err());
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        timeout: Duration,
        user_agent: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            user_agent: user_agent.into(),
        })
    }

    fn user_url(
        &self,
        login: &ExternalUserId,
        tail: Option<&str>,
    ) -> Result<Url, ExternalProfileSourceError> {
        user_url(&self.base_url, login, tail)
    }

    async fn get_json<T>(
        &self,
        url: Url,
        login: &ExternalUserId,
    ) -> Result<T, ExternalProfileSourceError>
    where
        T: DeserializeOwned,
    {
        debug!(%url, "requesting upstream resource");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .header(reqwest::header::ACCEPT, GITHUB_JSON_MEDIA_TYPE)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref(), login));
        }
        parse_json(body.as_ref())
    }
}

#[async_trait]
impl ExternalProfileSource for GitHubHttpSource {
    async fn fetch_user(
        &self,
        user_id: &ExternalUserId,
    ) -> Result<ExternalUserProfile, ExternalProfileSourceError> {
        let url = self.user_url(user_id, None)?;
        let user: GitHubUserDto = self.get_json(url, user_id).await?;
        Ok(user.into())
    }

    async fn fetch_followers(
        &self,
        login: &ExternalUserId,
    ) -> Result<Vec<ExternalFollower>, ExternalProfileSourceError> {
        let url = self.user_url(login, Some("followers"))?;
        let followers: Vec<GitHubFollowerDto> = self.get_json(url, login).await?;
        Ok(followers.into_iter().map(Into::into).collect())
    }

    async fn fetch_repos(
        &self,
        login: &ExternalUserId,
    ) -> Result<Vec<ExternalRepo>, ExternalProfileSourceError> {
        let url = self.user_url(login, Some("repos"))?;
        let repos: Vec<GitHubRepoDto> = self.get_json(url, login).await?;
        Ok(repos.into_iter().map(Into::into).collect())
    }
}

fn user_url(
    base_url: &Url,
    login: &ExternalUserId,
    tail: Option<&str>,
) -> Result<Url, ExternalProfileSourceError> {
    let mut url = base_url.clone();
    {
        let mut segments = url.path_segments_mut().map_err(|()| {
            ExternalProfileSourceError::transport(format!(
                "base URL {base_url} cannot carry path segments"
            ))
        })?;
        segments.pop_if_empty().push("users").push(login.as_ref());
        if let Some(tail) = tail {
            segments.push(tail);
        }
    }
    Ok(url)
}

fn parse_json<T>(body: &[u8]) -> Result<T, ExternalProfileSourceError>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(body).map_err(|error| {
        ExternalProfileSourceError::decode(format!("invalid GitHub JSON payload: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> ExternalProfileSourceError {
    if error.is_timeout() {
        ExternalProfileSourceError::timeout(error.to_string())
    } else {
        ExternalProfileSourceError::transport(error.to_string())
    }
}

fn map_status_error(
    status: StatusCode,
    body: &[u8],
    login: &ExternalUserId,
) -> ExternalProfileSourceError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::NOT_FOUND => ExternalProfileSourceError::not_found(login.to_string()),
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
            ExternalProfileSourceError::rate_limited(message)
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ExternalProfileSourceError::timeout(message)
        }
        _ => ExternalProfileSourceError::unexpected_status(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
