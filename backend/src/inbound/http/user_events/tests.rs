//! Tests for user-info event handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};
use uuid::Uuid;

use super::*;
use crate::domain::ports::MockUserInfoCommand;
use crate::domain::{EventMeta, SERVICE_ID, USER_INFO_CHANGED, UserInfoPayload};
use crate::inbound::http::error::json_config;
use crate::middleware::Trace;

fn sample_event(overrides: Option<ProfileOverrides>) -> UserInfoEvent {
    let overrides = overrides.unwrap_or_else(|| ProfileOverrides {
        email: "octocat@github.com".to_owned(),
        first_name: "The".to_owned(),
        last_name: "Octocat".to_owned(),
        time_zone_id: String::new(),
    });
    UserInfoEvent {
        meta: EventMeta {
            event_type: USER_INFO_CHANGED.to_owned(),
            event_id: Uuid::from_u128(1),
            created_at: 1_700_000_000_000_000_000,
            trace_id: Uuid::from_u128(2),
            service_id: SERVICE_ID.to_owned(),
        },
        payload: UserInfoPayload {
            id: 583_231,
            username: "octocat".to_owned(),
            followers: vec!["amy".to_owned()],
            repos: vec!["hello-world".to_owned()],
            email: overrides.email,
            first_name: overrides.first_name,
            last_name: overrides.last_name,
            time_zone_id: overrides.time_zone_id,
        },
    }
}

fn test_app(
    command: MockUserInfoCommand,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(HttpState::new(Arc::new(command))))
        .app_data(json_config())
        .wrap(Trace)
        .service(produce)
        .service(update)
}

async fn read_json(response: actix_web::dev::ServiceResponse) -> Value {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("JSON body")
}

#[actix_web::test]
async fn produce_returns_event_json() {
    let mut command = MockUserInfoCommand::new();
    command
        .expect_produce()
        .withf(|id| id.to_string() == "octocat")
        .times(1)
        .return_once(|_| Ok(sample_event(None)));
    let app = actix_test::init_service(test_app(command)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/produce/octocat")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let value = read_json(response).await;
    assert_eq!(value.pointer("/meta/type"), Some(&json!("UserInfoChanged")));
    assert_eq!(value.pointer("/payload/username"), Some(&json!("octocat")));
    assert_eq!(value.pointer("/payload/first_name"), Some(&json!("The")));
}

#[actix_web::test]
async fn update_passes_body_fields_through() {
    let mut command = MockUserInfoCommand::new();
    command
        .expect_update()
        .withf(|id, overrides| {
            id.to_string() == "octocat"
                && overrides.email == "ada@example.com"
                && overrides.time_zone_id == "Europe/London"
        })
        .times(1)
        .return_once(|_, overrides| Ok(sample_event(Some(overrides))));
    let app = actix_test::init_service(test_app(command)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/users/octocat")
            .set_json(json!({
                "email": "ada@example.com",
                "first_name": "Ada",
                "last_name": "Lovelace",
                "time_zone_id": "Europe/London",
            }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let value = read_json(response).await;
    assert_eq!(value.pointer("/payload/email"), Some(&json!("ada@example.com")));
    assert_eq!(value.pointer("/payload/last_name"), Some(&json!("Lovelace")));
    assert_eq!(
        value.pointer("/payload/time_zone_id"),
        Some(&json!("Europe/London"))
    );
}

#[actix_web::test]
async fn update_treats_missing_fields_as_empty() {
    let mut command = MockUserInfoCommand::new();
    command
        .expect_update()
        .withf(|_, overrides| {
            overrides.email == "ada@example.com"
                && overrides.first_name.is_empty()
                && overrides.time_zone_id.is_empty()
        })
        .times(1)
        .return_once(|_, overrides| Ok(sample_event(Some(overrides))));
    let app = actix_test::init_service(test_app(command)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/users/octocat")
            .set_json(json!({ "email": "ada@example.com" }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_web::test]
async fn update_treats_null_fields_as_empty() {
    let mut command = MockUserInfoCommand::new();
    command
        .expect_update()
        .withf(|_, overrides| {
            overrides.email.is_empty()
                && overrides.first_name == "Ada"
                && overrides.last_name.is_empty()
                && overrides.time_zone_id.is_empty()
        })
        .times(1)
        .return_once(|_, overrides| Ok(sample_event(Some(overrides))));
    let app = actix_test::init_service(test_app(command)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/users/octocat")
            .set_json(json!({
                "email": null,
                "first_name": "Ada",
                "last_name": null,
                "time_zone_id": null,
            }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let value = read_json(response).await;
    assert_eq!(value.pointer("/payload/email"), Some(&json!("")));
}

#[actix_web::test]
async fn update_rejects_malformed_body() {
    let mut command = MockUserInfoCommand::new();
    command.expect_update().times(0);
    let app = actix_test::init_service(test_app(command)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/users/octocat")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"email\": ")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value = read_json(response).await;
    assert_eq!(value.get("code"), Some(&json!("invalid_request")));
    assert_eq!(value.pointer("/details/field"), Some(&json!("body")));
    assert!(value.get("traceId").and_then(Value::as_str).is_some());
}

#[rstest]
#[case::whitespace("/produce/%20octocat".to_owned(), "user_id_whitespace")]
#[case::dot("/produce/%2E".to_owned(), "user_id_dot_segment")]
#[case::dot_dot("/produce/%2E%2E".to_owned(), "user_id_dot_segment")]
#[case::too_long(format!("/produce/{}", "a".repeat(EXTERNAL_ID_OVERFLOW)), "user_id_too_long")]
#[actix_web::test]
async fn produce_rejects_invalid_user_ids(#[case] uri: String, #[case] code: &str) {
    let mut command = MockUserInfoCommand::new();
    command.expect_produce().times(0);
    let app = actix_test::init_service(test_app(command)).await;

    let response =
        actix_test::call_service(&app, actix_test::TestRequest::post().uri(&uri).to_request()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value = read_json(response).await;
    assert_eq!(value.get("code"), Some(&json!("invalid_request")));
    assert_eq!(value.pointer("/details/field"), Some(&json!("user_id")));
    assert_eq!(value.pointer("/details/code"), Some(&json!(code)));
}

const EXTERNAL_ID_OVERFLOW: usize = crate::domain::EXTERNAL_USER_ID_MAX + 1;

#[rstest]
#[case::unavailable(Error::service_unavailable("upstream transport failed"), StatusCode::SERVICE_UNAVAILABLE)]
#[case::not_found(Error::not_found("user ghost not found"), StatusCode::NOT_FOUND)]
#[case::bad_gateway(Error::bad_gateway("upstream response decode failed"), StatusCode::BAD_GATEWAY)]
#[actix_web::test]
async fn domain_failures_map_to_status(#[case] failure: Error, #[case] expected: StatusCode) {
    let mut command = MockUserInfoCommand::new();
    command
        .expect_produce()
        .times(1)
        .return_once(move |_| Err(failure));
    let app = actix_test::init_service(test_app(command)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/produce/octocat")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), expected);
    assert!(response.headers().contains_key("trace-id"));
}
