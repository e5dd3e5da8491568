//! Driving port for building `UserInfoChanged` events.
//!
//! Inbound adapters call this port with an already validated user id; the
//! domain service behind it owns every upstream call.

use async_trait::async_trait;

use crate::domain::{Error, ExternalUserId, ProfileOverrides, UserInfoEvent};

/// Domain use-case port for producing user-info events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserInfoCommand: Send + Sync {
    /// Build an event from upstream data alone.
    async fn produce(&self, user_id: &ExternalUserId) -> Result<UserInfoEvent, Error>;

    /// Build an event whose contact fields come from `overrides`.
    async fn update(
        &self,
        user_id: &ExternalUserId,
        overrides: ProfileOverrides,
    ) -> Result<UserInfoEvent, Error>;
}
