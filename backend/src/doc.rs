//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the event endpoints, the health probes, and the
//! schemas they reference. Swagger UI serves it in debug builds and
//! `cargo run --bin openapi-dump` exports it for external tooling.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, EventMeta, UserInfoEvent, UserInfoPayload};
use crate::inbound::http::user_events::ProfileUpdateRequest;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User service API",
        description = "Builds UserInfoChanged events from upstream GitHub profiles."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::user_events::produce,
        crate::inbound::http::user_events::update,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserInfoEvent,
        EventMeta,
        UserInfoPayload,
        ProfileUpdateRequest,
        Error,
        ErrorCode
    )),
    tags(
        (name = "events", description = "UserInfoChanged event production"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
