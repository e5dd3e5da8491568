//! Log-backed event sink.
//!
//! Writes each built event as one structured `info` record carrying the
//! serialised event JSON. Log shippers forward these records downstream.

use async_trait::async_trait;
use tracing::info;

use crate::domain::UserInfoEvent;
use crate::domain::ports::{UserInfoEventSink, UserInfoEventSinkError};

/// Sink emitting events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingUserInfoEventSink;

#[async_trait]
impl UserInfoEventSink for TracingUserInfoEventSink {
    async fn publish(&self, event: &UserInfoEvent) -> Result<(), UserInfoEventSinkError> {
        let encoded = serde_json::to_string(event)
            .map_err(|err| UserInfoEventSinkError::encode(err.to_string()))?;
        info!(
            target: "user_service::events",
            event_type = %event.meta.event_type,
            event_id = %event.meta.event_id,
            event = %encoded,
            "user info event emitted"
        );
        Ok(())
    }
}
