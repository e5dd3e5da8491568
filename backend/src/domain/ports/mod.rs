//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod external_profile_source;
mod user_info_command;
mod user_info_event_sink;

#[cfg(test)]
pub use external_profile_source::MockExternalProfileSource;
pub use external_profile_source::{
    ExternalProfileSource, ExternalProfileSourceError, FixtureExternalProfileSource,
};
#[cfg(test)]
pub use user_info_command::MockUserInfoCommand;
pub use user_info_command::UserInfoCommand;
#[cfg(test)]
pub use user_info_event_sink::MockUserInfoEventSink;
pub use user_info_event_sink::{
    NoOpUserInfoEventSink, UserInfoEventSink, UserInfoEventSinkError,
};
