//! Driven port for emitting built events to downstream consumers.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::UserInfoEvent;

define_port_error! {
    /// Errors surfaced while emitting an event.
    pub enum UserInfoEventSinkError {
        /// The event could not be encoded for the sink.
        Encode { message: String } =>
            "event encoding failed: {message}",
        /// The sink refused or lost the event.
        Unavailable { message: String } =>
            "event sink unavailable: {message}",
    }
}

/// Port for emitting [`UserInfoEvent`]s.
///
/// Emission is best effort: callers log failures and still return the event.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserInfoEventSink: Send + Sync {
    /// Emit one event.
    async fn publish(&self, event: &UserInfoEvent) -> Result<(), UserInfoEventSinkError>;
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpUserInfoEventSink;

#[async_trait]
impl UserInfoEventSink for NoOpUserInfoEventSink {
    async fn publish(&self, _event: &UserInfoEvent) -> Result<(), UserInfoEventSinkError> {
        Ok(())
    }
}
