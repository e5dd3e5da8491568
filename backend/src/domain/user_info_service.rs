//! User-info event service.
//!
//! Implements the [`UserInfoCommand`] driving port: resolve the upstream
//! profile, gather followers and repositories, assemble the event, and hand it
//! to the event sink. All state lives in the call; the service itself only
//! holds shared, immutable collaborators.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    ExternalProfileSource, ExternalProfileSourceError, UserInfoCommand, UserInfoEventSink,
};
use crate::domain::{
    Error, EventStamp, ExternalUserId, ExternalUserProfile, ProfileOverrides, RepoRouting,
    UpstreamSnapshot, UserInfoEvent,
};

/// Tunables for event assembly and upstream calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserInfoPolicy {
    /// Where repository names are written in the payload.
    pub repo_routing: RepoRouting,
    /// Extra attempts for retryable upstream failures; `0` means one attempt.
    pub upstream_retries: u32,
    /// Pause between attempts.
    pub retry_delay: Duration,
}

impl Default for UserInfoPolicy {
    fn default() -> Self {
        Self {
            repo_routing: RepoRouting::Corrected,
            upstream_retries: 0,
            retry_delay: Duration::from_millis(200),
        }
    }
}

fn map_source_error(error: ExternalProfileSourceError) -> Error {
    match error {
        ExternalProfileSourceError::Transport { .. }
        | ExternalProfileSourceError::Timeout { .. }
        | ExternalProfileSourceError::RateLimited { .. } => {
            Error::service_unavailable(error.to_string())
        }
        ExternalProfileSourceError::NotFound { login } => {
            Error::not_found(format!("user {login} not found"))
        }
        ExternalProfileSourceError::UnexpectedStatus { .. }
        | ExternalProfileSourceError::Decode { .. } => Error::bad_gateway(error.to_string()),
    }
}

/// Service building `UserInfoChanged` events from upstream data.
#[derive(Clone)]
pub struct UserInfoService<S, K> {
    source: Arc<S>,
    sink: Arc<K>,
    clock: Arc<dyn Clock>,
    policy: UserInfoPolicy,
}

impl<S, K> UserInfoService<S, K> {
    /// Create a service with the default policy.
    pub fn new(source: Arc<S>, sink: Arc<K>, clock: Arc<dyn Clock>) -> Self {
        Self::with_policy(source, sink, clock, UserInfoPolicy::default())
    }

    /// Create a service with an explicit policy.
    pub fn with_policy(
        source: Arc<S>,
        sink: Arc<K>,
        clock: Arc<dyn Clock>,
        policy: UserInfoPolicy,
    ) -> Self {
        Self {
            source,
            sink,
            clock,
            policy,
        }
    }
}

impl<S, K> UserInfoService<S, K>
where
    S: ExternalProfileSource,
    K: UserInfoEventSink,
{
    async fn with_retry<T, F, Fut>(&self, what: &'static str, mut call: F) -> Result<T, Error>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ExternalProfileSourceError>>,
    {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match call().await {
                Ok(value) => return Ok(value),
                Err(error) if error.is_retryable() && attempt <= self.policy.upstream_retries => {
                    warn!(%error, fetch = what, attempt, "retrying upstream fetch");
                    tokio::time::sleep(self.policy.retry_delay).await;
                }
                Err(error) => {
                    warn!(%error, fetch = what, attempt, "upstream fetch failed");
                    return Err(map_source_error(error));
                }
            }
        }
    }

    async fn fetch_profile(&self, user_id: &ExternalUserId) -> Result<ExternalUserProfile, Error> {
        debug!(user_id = %user_id, "fetching upstream profile");
        let source = &self.source;
        self.with_retry("user", move || source.fetch_user(user_id))
            .await
    }

    /// Gather followers and repositories for `profile` and assemble its event.
    ///
    /// With `overrides` the contact fields are taken from the caller; without
    /// them they are derived from the profile. The built event is handed to
    /// the sink before it is returned; a sink failure is logged only.
    ///
    /// # Errors
    ///
    /// Upstream failures map to `service_unavailable`, `not_found`, or
    /// `bad_gateway`; nothing here aborts the process.
    pub async fn build_event(
        &self,
        profile: ExternalUserProfile,
        overrides: Option<ProfileOverrides>,
    ) -> Result<UserInfoEvent, Error> {
        let login = profile.login_id().map_err(|err| {
            Error::bad_gateway(format!("upstream returned an unusable login: {err}"))
        })?;

        let source = &self.source;
        let login_ref = &login;
        let followers = self
            .with_retry("followers", move || source.fetch_followers(login_ref))
            .await?;
        let repos = self
            .with_retry("repos", move || source.fetch_repos(login_ref))
            .await?;

        let stamp = EventStamp::now(self.clock.utc());
        let event = UserInfoEvent::assemble(
            stamp,
            UpstreamSnapshot {
                profile,
                followers,
                repos,
            },
            overrides,
            self.policy.repo_routing,
        )?;

        info!(
            event_id = %event.meta.event_id,
            username = %event.payload.username,
            followers = event.payload.followers.len(),
            repos = event.payload.repos.len(),
            "user info event built"
        );

        if let Err(error) = self.sink.publish(&event).await {
            warn!(%error, event_id = %event.meta.event_id, "failed to emit user info event");
        }

        Ok(event)
    }
}

#[async_trait]
impl<S, K> UserInfoCommand for UserInfoService<S, K>
where
    S: ExternalProfileSource,
    K: UserInfoEventSink,
{
    async fn produce(&self, user_id: &ExternalUserId) -> Result<UserInfoEvent, Error> {
        let profile = self.fetch_profile(user_id).await?;
        self.build_event(profile, None).await
    }

    async fn update(
        &self,
        user_id: &ExternalUserId,
        overrides: ProfileOverrides,
    ) -> Result<UserInfoEvent, Error> {
        let profile = self.fetch_profile(user_id).await?;
        self.build_event(profile, Some(overrides)).await
    }
}

#[cfg(test)]
#[path = "user_info_service_tests.rs"]
mod tests;
