//! Service entry-point: loads settings, wires the GitHub adapter into the
//! event service, and serves the HTTP API.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use user_service::domain::UserInfoService;
use user_service::inbound::http::health::HealthState;
use user_service::inbound::http::state::HttpState;
use user_service::outbound::event_sink::TracingUserInfoEventSink;
use user_service::outbound::github::GitHubHttpSource;
use user_service::settings::ServiceSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServiceSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load service settings: {err}"))?;
    let base_url = settings
        .github_api_url()
        .wrap_err("invalid upstream configuration")?;
    let source = GitHubHttpSource::new(
        base_url.clone(),
        settings.request_timeout(),
        settings.user_agent(),
    )
    .wrap_err("failed to build upstream HTTP client")?;
    let policy = settings.policy();
    info!(
        upstream = %base_url,
        retries = policy.upstream_retries,
        routing = ?policy.repo_routing,
        "user info service configured"
    );

    let service = UserInfoService::with_policy(
        Arc::new(source),
        Arc::new(TracingUserInfoEventSink),
        Arc::new(DefaultClock),
        policy,
    );

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(settings.bind_addr(), HttpState::new(Arc::new(service)));
    let server = create_server(health_state, config).wrap_err("failed to bind HTTP listener")?;
    server.await.wrap_err("HTTP server terminated")?;
    Ok(())
}
