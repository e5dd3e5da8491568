//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data`, so they depend only
//! on the driving port and stay testable without network I/O.

use std::sync::Arc;

use crate::domain::ports::UserInfoCommand;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub user_info: Arc<dyn UserInfoCommand>,
}

impl HttpState {
    /// Construct state from the user-info command port.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use user_service::domain::UserInfoService;
    /// use user_service::domain::ports::{FixtureExternalProfileSource, NoOpUserInfoEventSink};
    /// use user_service::inbound::http::state::HttpState;
    ///
    /// let service = UserInfoService::new(
    ///     Arc::new(FixtureExternalProfileSource),
    ///     Arc::new(NoOpUserInfoEventSink),
    ///     Arc::new(DefaultClock),
    /// );
    /// let _state = HttpState::new(Arc::new(service));
    /// ```
    pub fn new(user_info: Arc<dyn UserInfoCommand>) -> Self {
        Self { user_info }
    }
}
