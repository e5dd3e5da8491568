//! End-to-end coverage for the event endpoints.
//!
//! A fake GitHub API runs on an ephemeral local port; the real reqwest
//! adapter, domain service, trace middleware, and handlers are driven against
//! it through Actix's test service.

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::{ServerHandle, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, test, web};
use mockable::DefaultClock;
use serde_json::{Value, json};
use url::Url;

use user_service::Trace;
use user_service::domain::ports::NoOpUserInfoEventSink;
use user_service::domain::{RepoRouting, UserInfoPolicy, UserInfoService};
use user_service::inbound::http::error::json_config;
use user_service::inbound::http::state::HttpState;
use user_service::inbound::http::user_events::{produce, update};
use user_service::outbound::github::GitHubHttpSource;

const USER_AGENT: &str = "user-service-tests/1.0";

async fn fake_user(req: HttpRequest, path: web::Path<String>) -> HttpResponse {
    if !has_expected_agent(&req) {
        return HttpResponse::Forbidden().json(json!({ "message": "missing user agent" }));
    }
    match path.as_str() {
        "octocat" => HttpResponse::Ok().json(json!({
            "login": "octocat",
            "id": 583_231,
            "name": "The Octocat",
            "email": null,
            "public_repos": 2,
        })),
        "loner" => HttpResponse::Ok().json(json!({
            "login": "loner",
            "id": 7,
            "name": "Ada",
            "email": "ada@example.com",
        })),
        "garbled" => HttpResponse::Ok().json(json!({ "login": "garbled", "id": 9 })),
        _ => HttpResponse::NotFound().json(json!({ "message": "Not Found" })),
    }
}

async fn fake_followers(req: HttpRequest, path: web::Path<String>) -> HttpResponse {
    if !has_expected_agent(&req) {
        return HttpResponse::Forbidden().finish();
    }
    match path.as_str() {
        "octocat" => HttpResponse::Ok().json(json!([
            { "login": "zed", "id": 1 },
            { "login": "amy", "id": 2 },
        ])),
        "garbled" => HttpResponse::Ok()
            .content_type("application/json")
            .body("<html>oops</html>"),
        _ => HttpResponse::Ok().json(json!([])),
    }
}

async fn fake_repos(req: HttpRequest, path: web::Path<String>) -> HttpResponse {
    if !has_expected_agent(&req) {
        return HttpResponse::Forbidden().finish();
    }
    match path.as_str() {
        "octocat" => HttpResponse::Ok().json(json!([
            { "name": "hello-world", "fork": false },
            { "name": "spoon-knife", "fork": false },
        ])),
        "loner" => HttpResponse::Ok().json(json!([{ "name": "repo-a" }, { "name": "repo-b" }])),
        _ => HttpResponse::Ok().json(json!([])),
    }
}

fn has_expected_agent(req: &HttpRequest) -> bool {
    req.headers()
        .get("user-agent")
        .and_then(|value| value.to_str().ok())
        == Some(USER_AGENT)
}

fn spawn_fake_github() -> Result<(Url, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;

    let server = HttpServer::new(|| {
        App::new()
            .route("/users/{login}", web::get().to(fake_user))
            .route("/users/{login}/followers", web::get().to(fake_followers))
            .route("/users/{login}/repos", web::get().to(fake_repos))
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);
    let base = Url::parse(&format!("http://{addr}")).map_err(|err| err.to_string())?;
    Ok((base, handle))
}

fn unreachable_base() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind probe port");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);
    Url::parse(&format!("http://{addr}")).expect("valid url")
}

fn http_state(base: Url, routing: RepoRouting) -> web::Data<HttpState> {
    let source = GitHubHttpSource::new(base, Duration::from_secs(5), USER_AGENT)
        .expect("reqwest client builds");
    let service = UserInfoService::with_policy(
        Arc::new(source),
        Arc::new(NoOpUserInfoEventSink),
        Arc::new(DefaultClock),
        UserInfoPolicy {
            repo_routing: routing,
            ..UserInfoPolicy::default()
        },
    );
    web::Data::new(HttpState::new(Arc::new(service)))
}

async fn call(state: web::Data<HttpState>, req: test::TestRequest) -> ServiceResponse {
    let app = test::init_service(
        App::new()
            .app_data(state)
            .app_data(json_config())
            .wrap(Trace)
            .service(produce)
            .service(update),
    )
    .await;
    test::call_service(&app, req.to_request()).await
}

fn header_trace_id(res: &ServiceResponse) -> String {
    res.headers()
        .get("trace-id")
        .expect("trace-id header")
        .to_str()
        .expect("ascii header")
        .to_owned()
}

#[actix_web::test]
async fn produce_builds_event_from_fake_upstream() {
    let (base, handle) = spawn_fake_github().expect("fake upstream starts");

    let res = call(
        http_state(base, RepoRouting::Corrected),
        test::TestRequest::post().uri("/produce/octocat"),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let trace_id = header_trace_id(&res);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.pointer("/meta/trace_id"), Some(&json!(trace_id)));
    assert_ne!(body.pointer("/meta/event_id"), body.pointer("/meta/trace_id"));
    insta::assert_json_snapshot!(body, {
        ".meta.event_id" => "[event_id]",
        ".meta.trace_id" => "[trace_id]",
        ".meta.created_at" => "[created_at]",
    }, @r#"
    {
      "meta": {
        "created_at": "[created_at]",
        "event_id": "[event_id]",
        "service_id": "user-service",
        "trace_id": "[trace_id]",
        "type": "UserInfoChanged"
      },
      "payload": {
        "email": "",
        "first_name": "The",
        "followers": [
          "zed",
          "amy"
        ],
        "id": 583231,
        "last_name": "Octocat",
        "repos": [
          "hello-world",
          "spoon-knife"
        ],
        "time_zone_id": "",
        "username": "octocat"
      }
    }
    "#);

    handle.stop(true).await;
}

#[actix_web::test]
async fn update_overrides_contact_fields() {
    let (base, handle) = spawn_fake_github().expect("fake upstream starts");

    let res = call(
        http_state(base, RepoRouting::Corrected),
        test::TestRequest::put().uri("/users/octocat").set_json(json!({
            "email": "countess@example.com",
            "first_name": "Augusta",
            "last_name": "King",
            "time_zone_id": "Europe/London",
        })),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.pointer("/payload/id"), Some(&json!(583_231)));
    assert_eq!(body.pointer("/payload/username"), Some(&json!("octocat")));
    assert_eq!(
        body.pointer("/payload/email"),
        Some(&json!("countess@example.com"))
    );
    assert_eq!(body.pointer("/payload/first_name"), Some(&json!("Augusta")));
    assert_eq!(body.pointer("/payload/last_name"), Some(&json!("King")));
    assert_eq!(
        body.pointer("/payload/time_zone_id"),
        Some(&json!("Europe/London"))
    );
    assert_eq!(body.pointer("/payload/followers"), Some(&json!(["zed", "amy"])));

    handle.stop(true).await;
}

#[actix_web::test]
async fn repos_without_followers_land_in_repos() {
    let (base, handle) = spawn_fake_github().expect("fake upstream starts");

    let res = call(
        http_state(base, RepoRouting::Corrected),
        test::TestRequest::post().uri("/produce/loner"),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.pointer("/payload/followers"), Some(&json!([])));
    assert_eq!(body.pointer("/payload/repos"), Some(&json!(["repo-a", "repo-b"])));
    assert_eq!(body.pointer("/payload/first_name"), Some(&json!("Ada")));
    assert_eq!(body.pointer("/payload/last_name"), Some(&json!("")));

    handle.stop(true).await;
}

#[actix_web::test]
async fn legacy_routing_reproduces_first_release_repos() {
    let (base, handle) = spawn_fake_github().expect("fake upstream starts");

    let res = call(
        http_state(base, RepoRouting::Legacy),
        test::TestRequest::post().uri("/produce/octocat"),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(
        body.pointer("/payload/repos"),
        Some(&json!(["zed", "amy", "spoon-knife"]))
    );

    handle.stop(true).await;
}

#[actix_web::test]
async fn consecutive_calls_get_fresh_identifiers() {
    let (base, handle) = spawn_fake_github().expect("fake upstream starts");
    let state = http_state(base, RepoRouting::Corrected);

    let first: Value = test::read_body_json(
        call(state.clone(), test::TestRequest::post().uri("/produce/octocat")).await,
    )
    .await;
    let second: Value = test::read_body_json(
        call(state, test::TestRequest::post().uri("/produce/octocat")).await,
    )
    .await;

    assert_ne!(first.pointer("/meta/event_id"), second.pointer("/meta/event_id"));
    assert_ne!(first.pointer("/meta/trace_id"), second.pointer("/meta/trace_id"));

    handle.stop(true).await;
}

#[actix_web::test]
async fn unknown_upstream_user_is_not_found() {
    let (base, handle) = spawn_fake_github().expect("fake upstream starts");

    let res = call(
        http_state(base, RepoRouting::Corrected),
        test::TestRequest::post().uri("/produce/ghost"),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.get("code"), Some(&json!("not_found")));

    handle.stop(true).await;
}

#[actix_web::test]
async fn undecodable_follower_page_is_bad_gateway() {
    let (base, handle) = spawn_fake_github().expect("fake upstream starts");

    let res = call(
        http_state(base, RepoRouting::Corrected),
        test::TestRequest::post().uri("/produce/garbled"),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.get("code"), Some(&json!("bad_gateway")));

    handle.stop(true).await;
}

#[actix_web::test]
async fn unreachable_upstream_is_service_unavailable() {
    let res = call(
        http_state(unreachable_base(), RepoRouting::Corrected),
        test::TestRequest::post().uri("/produce/octocat"),
    )
    .await;

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let trace_id = header_trace_id(&res);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.get("code"), Some(&json!("service_unavailable")));
    assert_eq!(body.get("traceId"), Some(&json!(trace_id)));
}
