//! DTOs for decoding GitHub REST responses.
//!
//! Only the fields the event builder reads are declared; everything else in
//! the upstream payload is ignored.

use serde::Deserialize;

use crate::domain::{ExternalFollower, ExternalRepo, ExternalUserProfile};

#[derive(Debug, Deserialize)]
pub(super) struct GitHubUserDto {
    pub(super) id: u64,
    pub(super) login: String,
    #[serde(default)]
    pub(super) name: Option<String>,
    #[serde(default)]
    pub(super) email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GitHubFollowerDto {
    pub(super) login: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct GitHubRepoDto {
    pub(super) name: String,
}

impl From<GitHubUserDto> for ExternalUserProfile {
    fn from(value: GitHubUserDto) -> Self {
        Self {
            id: value.id,
            login: value.login,
            name: value.name,
            email: value.email,
        }
    }
}

impl From<GitHubFollowerDto> for ExternalFollower {
    fn from(value: GitHubFollowerDto) -> Self {
        Self { login: value.login }
    }
}

impl From<GitHubRepoDto> for ExternalRepo {
    fn from(value: GitHubRepoDto) -> Self {
        Self { name: value.name }
    }
}
