//! User-info event service library.
//!
//! Fetches a user's profile, followers, and repositories from the GitHub REST
//! API and assembles them into a `UserInfoChanged` event.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
