//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **github**: reqwest-backed `ExternalProfileSource` for the GitHub REST API
//! - **event_sink**: `tracing`-backed `UserInfoEventSink`
//!
//! Adapters are thin translators between domain types and wire
//! representations. They contain no business logic.

pub mod event_sink;
pub mod github;
