//! The `UserInfoChanged` notification event and its assembly rules.
//!
//! Field names on the wire are fixed by downstream consumers, so the serde
//! shape here is the contract: `meta` carries the envelope and `payload` the
//! business data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Error, ExternalFollower, ExternalRepo, ExternalUserProfile, TraceId};

/// Envelope `type` for every event this service builds.
pub const USER_INFO_CHANGED: &str = "UserInfoChanged";
/// Envelope `service_id` identifying this service as the producer.
pub const SERVICE_ID: &str = "user-service";

/// Caller-supplied profile fields for the update operation.
///
/// Absent fields arrive as empty strings; an explicit `""` is
/// indistinguishable from omission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileOverrides {
    /// Replacement email.
    pub email: String,
    /// Replacement first name.
    pub first_name: String,
    /// Replacement last name.
    pub last_name: String,
    /// Caller's time zone identifier.
    pub time_zone_id: String,
}

/// How repository names are routed into the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepoRouting {
    /// Repository names land in `payload.repos`.
    #[default]
    Corrected,
    /// Matches the first release: `repos` is the follower list
    /// plus the last repository name, and stays empty without repositories.
    Legacy,
}

/// Envelope block of a [`UserInfoEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EventMeta {
    /// Event type discriminator, always [`USER_INFO_CHANGED`].
    #[serde(rename = "type")]
    #[schema(example = "UserInfoChanged")]
    pub event_type: String,
    /// Fresh identifier for this event.
    pub event_id: Uuid,
    /// Creation time in nanoseconds since the Unix epoch.
    #[schema(example = 1_700_000_000_000_000_000_i64)]
    pub created_at: i64,
    /// Correlation identifier of the request that produced the event.
    pub trace_id: Uuid,
    /// Producing service, always [`SERVICE_ID`].
    #[schema(example = "user-service")]
    pub service_id: String,
}

/// Business data block of a [`UserInfoEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserInfoPayload {
    /// Upstream numeric user id.
    #[schema(example = 583_231)]
    pub id: u64,
    /// Upstream login.
    #[schema(example = "octocat")]
    pub username: String,
    /// Follower logins in upstream order.
    pub followers: Vec<String>,
    /// Repository names in upstream order.
    pub repos: Vec<String>,
    /// Email address.
    pub email: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Time zone identifier; only set by the update operation.
    pub time_zone_id: String,
}

/// `UserInfoChanged` event returned to callers and handed to the event sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserInfoEvent {
    /// Envelope.
    pub meta: EventMeta,
    /// Payload.
    pub payload: UserInfoPayload,
}

/// Identity and timing for one event, decided before assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventStamp {
    /// Fresh event identifier.
    pub event_id: Uuid,
    /// Request correlation identifier.
    pub trace_id: TraceId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl EventStamp {
    /// Stamp an event created at `created_at` within the current trace scope.
    ///
    /// The event id is always a new v4 UUID, independent of the trace id.
    #[must_use]
    pub fn now(created_at: DateTime<Utc>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            trace_id: TraceId::current_or_generate(),
            created_at,
        }
    }
}

/// Upstream data gathered for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamSnapshot {
    /// The resolved profile.
    pub profile: ExternalUserProfile,
    /// Followers as returned upstream.
    pub followers: Vec<ExternalFollower>,
    /// Repositories as returned upstream.
    pub repos: Vec<ExternalRepo>,
}

/// Split a display name at its first space.
///
/// A name without a space is all first name. Everything after the first space
/// stays together as the last name.
///
/// # Examples
/// ```
/// use user_service::domain::split_full_name;
///
/// assert_eq!(split_full_name("Ada Lovelace"), ("Ada", "Lovelace"));
/// assert_eq!(split_full_name("Ada"), ("Ada", ""));
/// ```
#[must_use]
pub fn split_full_name(full_name: &str) -> (&str, &str) {
    full_name.split_once(' ').unwrap_or((full_name, ""))
}

impl UserInfoEvent {
    /// Assemble an event from upstream data and optional caller overrides.
    ///
    /// Identity fields always come from `snapshot.profile`. With overrides the
    /// contact fields are copied verbatim; without them email comes from the
    /// profile and the display name is split into first and last names.
    ///
    /// # Errors
    ///
    /// Returns an internal error when `stamp.created_at` cannot be expressed
    /// as nanoseconds in an `i64`.
    pub fn assemble(
        stamp: EventStamp,
        snapshot: UpstreamSnapshot,
        overrides: Option<ProfileOverrides>,
        routing: RepoRouting,
    ) -> Result<Self, Error> {
        let created_at = stamp.created_at.timestamp_nanos_opt().ok_or_else(|| {
            Error::internal(format!(
                "event timestamp {} is outside the nanosecond range",
                stamp.created_at
            ))
        })?;

        let UpstreamSnapshot {
            profile,
            followers,
            repos,
        } = snapshot;

        let ProfileOverrides {
            email,
            first_name,
            last_name,
            time_zone_id,
        } = match overrides {
            Some(overrides) => overrides,
            None => {
                let (first, last) = split_full_name(profile.name.as_deref().unwrap_or_default());
                ProfileOverrides {
                    email: profile.email.clone().unwrap_or_default(),
                    first_name: first.to_owned(),
                    last_name: last.to_owned(),
                    time_zone_id: String::new(),
                }
            }
        };

        let followers: Vec<String> = followers.into_iter().map(|f| f.login).collect();
        let repos = route_repos(&followers, repos, routing);

        Ok(Self {
            meta: EventMeta {
                event_type: USER_INFO_CHANGED.to_owned(),
                event_id: stamp.event_id,
                created_at,
                trace_id: *stamp.trace_id.as_uuid(),
                service_id: SERVICE_ID.to_owned(),
            },
            payload: UserInfoPayload {
                id: profile.id,
                username: profile.login,
                followers,
                repos,
                email,
                first_name,
                last_name,
                time_zone_id,
            },
        })
    }
}

fn route_repos(followers: &[String], repos: Vec<ExternalRepo>, routing: RepoRouting) -> Vec<String> {
    match routing {
        RepoRouting::Corrected => repos.into_iter().map(|r| r.name).collect(),
        RepoRouting::Legacy => match repos.into_iter().last() {
            Some(last) => {
                let mut routed = followers.to_vec();
                routed.push(last.name);
                routed
            }
            None => Vec::new(),
        },
    }
}

#[cfg(test)]
#[path = "user_info_event_tests.rs"]
mod tests;
