//! User-info event handlers.
//!
//! ```text
//! POST /produce/{user_id}
//! PUT /users/{user_id} {"email":"ada@example.com","first_name":"Ada","last_name":"Lovelace","time_zone_id":"Europe/London"}
//! ```
//!
//! Both handlers answer with the assembled `UserInfoChanged` event.

use actix_web::{post, put, web};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{
    Error, ExternalUserId, ExternalUserIdValidationError, ProfileOverrides, UserInfoEvent,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Request body for `PUT /users/{user_id}`.
///
/// Missing and `null` fields are treated as empty strings.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct ProfileUpdateRequest {
    #[serde(deserialize_with = "null_as_empty")]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    #[schema(example = "Ada")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    #[schema(example = "Lovelace")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    #[schema(example = "Europe/London")]
    pub time_zone_id: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl From<ProfileUpdateRequest> for ProfileOverrides {
    fn from(value: ProfileUpdateRequest) -> Self {
        let ProfileUpdateRequest {
            email,
            first_name,
            last_name,
            time_zone_id,
        } = value;
        Self {
            email,
            first_name,
            last_name,
            time_zone_id,
        }
    }
}

fn parse_user_id(raw: String) -> Result<ExternalUserId, Error> {
    ExternalUserId::new(raw).map_err(map_user_id_validation_error)
}

fn map_user_id_validation_error(err: ExternalUserIdValidationError) -> Error {
    let code = match err {
        ExternalUserIdValidationError::Empty => "empty_user_id",
        ExternalUserIdValidationError::SurroundingWhitespace => "user_id_whitespace",
        ExternalUserIdValidationError::ContainsSlash => "user_id_contains_slash",
        ExternalUserIdValidationError::DotSegment => "user_id_dot_segment",
        ExternalUserIdValidationError::TooLong { .. } => "user_id_too_long",
    };
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": "user_id", "code": code }))
}

/// Build a `UserInfoChanged` event from the upstream profile alone.
///
/// Email and names come from the upstream profile; `time_zone_id` is empty.
#[utoipa::path(
    post,
    path = "/produce/{user_id}",
    params(("user_id" = String, Path, description = "Upstream login")),
    responses(
        (status = 200, description = "Assembled event", body = UserInfoEvent),
        (status = 400, description = "Invalid user id", body = Error),
        (status = 404, description = "Upstream user not found", body = Error),
        (status = 502, description = "Upstream response unusable", body = Error),
        (status = 503, description = "Upstream unreachable or throttling", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["events"],
    operation_id = "produceUserInfo"
)]
#[post("/produce/{user_id}")]
pub async fn produce(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserInfoEvent>> {
    let user_id = parse_user_id(path.into_inner())?;
    info!(user_id = %user_id, "produce requested");
    let event = state.user_info.produce(&user_id).await?;
    Ok(web::Json(event))
}

/// Build a `UserInfoChanged` event whose contact fields come from the body.
///
/// Identity, followers, and repositories still come from upstream.
#[utoipa::path(
    put,
    path = "/users/{user_id}",
    params(("user_id" = String, Path, description = "Upstream login")),
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "Assembled event", body = UserInfoEvent),
        (status = 400, description = "Invalid user id or body", body = Error),
        (status = 404, description = "Upstream user not found", body = Error),
        (status = 502, description = "Upstream response unusable", body = Error),
        (status = 503, description = "Upstream unreachable or throttling", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["events"],
    operation_id = "updateUserInfo"
)]
#[put("/users/{user_id}")]
pub async fn update(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ProfileUpdateRequest>,
) -> ApiResult<web::Json<UserInfoEvent>> {
    let user_id = parse_user_id(path.into_inner())?;
    info!(user_id = %user_id, "update requested");
    let event = state
        .user_info
        .update(&user_id, payload.into_inner().into())
        .await?;
    Ok(web::Json(event))
}

#[cfg(test)]
mod tests;
