//! Driven port for reading users, followers, and repositories from the
//! external source-control hosting API.
//!
//! The domain owns the response contract; adapters own URLs, headers, and
//! JSON shapes.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{ExternalFollower, ExternalRepo, ExternalUserId, ExternalUserProfile};

define_port_error! {
    /// Errors surfaced while calling the external hosting API.
    pub enum ExternalProfileSourceError {
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "upstream transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } =>
            "upstream timeout: {message}",
        /// Upstream throttled the request.
        RateLimited { message: String } =>
            "upstream rate limited request: {message}",
        /// Upstream does not know the requested user.
        NotFound { login: String } =>
            "upstream user {login} not found",
        /// Upstream answered with a status we do not handle.
        UnexpectedStatus { message: String } =>
            "upstream returned unexpected status: {message}",
        /// The response body did not match the expected JSON shape.
        Decode { message: String } =>
            "upstream response decode failed: {message}",
    }
}

impl ExternalProfileSourceError {
    /// Return whether retrying this error is expected to help.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }
}

/// Port for fetching upstream user data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExternalProfileSource: Send + Sync {
    /// Fetch the profile for `user_id`.
    async fn fetch_user(
        &self,
        user_id: &ExternalUserId,
    ) -> Result<ExternalUserProfile, ExternalProfileSourceError>;

    /// Fetch the first page of followers for `login`, in upstream order.
    async fn fetch_followers(
        &self,
        login: &ExternalUserId,
    ) -> Result<Vec<ExternalFollower>, ExternalProfileSourceError>;

    /// Fetch the first page of public repositories for `login`, in upstream order.
    async fn fetch_repos(
        &self,
        login: &ExternalUserId,
    ) -> Result<Vec<ExternalRepo>, ExternalProfileSourceError>;
}

/// Fixture source answering every lookup with a fixed profile and no
/// followers or repositories.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureExternalProfileSource;

#[async_trait]
impl ExternalProfileSource for FixtureExternalProfileSource {
    async fn fetch_user(
        &self,
        user_id: &ExternalUserId,
    ) -> Result<ExternalUserProfile, ExternalProfileSourceError> {
        Ok(ExternalUserProfile {
            id: 1,
            login: user_id.to_string(),
            name: Some("Ada Lovelace".to_owned()),
            email: None,
        })
    }

    async fn fetch_followers(
        &self,
        _login: &ExternalUserId,
    ) -> Result<Vec<ExternalFollower>, ExternalProfileSourceError> {
        Ok(Vec::new())
    }

    async fn fetch_repos(
        &self,
        _login: &ExternalUserId,
    ) -> Result<Vec<ExternalRepo>, ExternalProfileSourceError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::transport(ExternalProfileSourceError::transport("reset"), true)]
    #[case::timeout(ExternalProfileSourceError::timeout("slow"), true)]
    #[case::rate_limited(ExternalProfileSourceError::rate_limited("403"), true)]
    #[case::not_found(ExternalProfileSourceError::not_found("ghost"), false)]
    #[case::unexpected(ExternalProfileSourceError::unexpected_status("500"), false)]
    #[case::decode(ExternalProfileSourceError::decode("eof"), false)]
    fn retryability_follows_failure_kind(
        #[case] error: ExternalProfileSourceError,
        #[case] expected: bool,
    ) {
        assert_eq!(error.is_retryable(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_echoes_requested_login() {
        let id = ExternalUserId::new("octocat").expect("valid id");
        let profile = FixtureExternalProfileSource
            .fetch_user(&id)
            .await
            .expect("fixture profile");
        assert_eq!(profile.login, "octocat");
    }
}
