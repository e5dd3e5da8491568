//! Domain primitives, events, services, and ports.
//!
//! Purpose: keep event assembly and upstream error semantics independent of
//! Actix and reqwest. Inbound adapters call the [`ports::UserInfoCommand`]
//! driving port; outbound adapters implement the driven ports.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - ExternalUserId and the upstream record slices the builder reads.
//! - UserInfoEvent and its assembly rules.
//! - UserInfoService: the event builder behind the driving port.
//! - TraceId: request-scoped correlation identifier.

pub mod error;
pub mod external_user;
pub mod ports;
pub mod trace_id;
pub mod user_info_event;
pub mod user_info_service;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::external_user::{
    EXTERNAL_USER_ID_MAX, ExternalFollower, ExternalRepo, ExternalUserId,
    ExternalUserIdValidationError, ExternalUserProfile,
};
pub use self::trace_id::TraceId;
pub use self::user_info_event::{
    EventMeta, EventStamp, ProfileOverrides, RepoRouting, SERVICE_ID, USER_INFO_CHANGED,
    UpstreamSnapshot, UserInfoEvent, UserInfoPayload, split_full_name,
};
pub use self::user_info_service::{UserInfoPolicy, UserInfoService};

/// Header carrying the request trace identifier on every response.
pub const TRACE_ID_HEADER: &str = "trace-id";
