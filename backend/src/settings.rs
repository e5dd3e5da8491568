//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `USER_SERVICE_*` environment variables, and
//! optional configuration files, in OrthoConfig's usual precedence order.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::{RepoRouting, UserInfoPolicy};

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 8081;
const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_USER_AGENT: &str = "user-service/0.1";
const DEFAULT_RETRY_DELAY_MS: u64 = 200;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// The configured upstream base URL could not be parsed.
    #[error("invalid github_api_url {value:?}: {message}")]
    InvalidApiUrl { value: String, message: String },
    /// The configured upstream base URL cannot carry path segments.
    #[error("github_api_url {value:?} cannot be used as a base URL")]
    CannotBeBase { value: String },
}

/// Runtime settings for the user-info service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USER_SERVICE")]
pub struct ServiceSettings {
    /// Interface to bind.
    pub host: Option<IpAddr>,
    /// Port to bind.
    pub port: Option<u16>,
    /// Base URL of the hosting API; `/users/...` is appended.
    pub github_api_url: Option<String>,
    /// Per-request timeout for upstream calls, in seconds.
    pub request_timeout_secs: Option<u64>,
    /// `User-Agent` header sent upstream.
    pub user_agent: Option<String>,
    /// Extra attempts for retryable upstream failures.
    pub upstream_retries: Option<u32>,
    /// Pause between upstream attempts, in milliseconds.
    pub upstream_retry_delay_ms: Option<u64>,
    /// Route repositories exactly as the first release did.
    #[ortho_config(default = false)]
    pub legacy_repo_routing: bool,
}

impl ServiceSettings {
    /// Socket address to bind.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(DEFAULT_HOST),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    /// Parsed upstream base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the configured value is not an absolute
    /// URL that can carry path segments.
    pub fn github_api_url(&self) -> Result<Url, SettingsError> {
        let raw = self
            .github_api_url
            .as_deref()
            .unwrap_or(DEFAULT_GITHUB_API_URL);
        let url = Url::parse(raw).map_err(|err| SettingsError::InvalidApiUrl {
            value: raw.to_owned(),
            message: err.to_string(),
        })?;
        if url.cannot_be_a_base() {
            return Err(SettingsError::CannotBeBase {
                value: raw.to_owned(),
            });
        }
        Ok(url)
    }

    /// Upstream request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// `User-Agent` header value.
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Event assembly and retry policy derived from these settings.
    pub fn policy(&self) -> UserInfoPolicy {
        UserInfoPolicy {
            repo_routing: if self.legacy_repo_routing {
                RepoRouting::Legacy
            } else {
                RepoRouting::Corrected
            },
            upstream_retries: self.upstream_retries.unwrap_or(0),
            retry_delay: Duration::from_millis(
                self.upstream_retry_delay_ms
                    .unwrap_or(DEFAULT_RETRY_DELAY_MS),
            ),
        }
    }
}
