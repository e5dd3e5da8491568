//! GitHub outbound adapters.
//!
//! A thin reqwest implementation of the `ExternalProfileSource` port against
//! the public REST API.

mod dto;
mod http_source;

pub use http_source::GitHubHttpSource;
