//! External user identity and the slices of upstream data the event builder
//! consumes.
//!
//! The hosting API returns far wider records than these; adapters decode only
//! the fields below so upstream schema churn stays at the edge.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum accepted length for an external user id path token.
pub const EXTERNAL_USER_ID_MAX: usize = 100;

/// Validation errors returned by [`ExternalUserId::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExternalUserIdValidationError {
    /// The id was empty.
    #[error("user id must not be empty")]
    Empty,
    /// The id carried leading or trailing whitespace.
    #[error("user id must not have surrounding whitespace")]
    SurroundingWhitespace,
    /// The id contained a path separator.
    #[error("user id must not contain '/'")]
    ContainsSlash,
    /// The id was a relative path segment (`.` or `..`).
    #[error("user id must not be '.' or '..'")]
    DotSegment,
    /// The id exceeded [`EXTERNAL_USER_ID_MAX`].
    #[error("user id must be at most {max} characters")]
    TooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

/// Opaque external user identifier taken from the request path.
///
/// The upstream API resolves it (typically a login); this type only guarantees
/// it is safe to splice into an upstream URL path segment.
///
/// # Examples
/// ```
/// use user_service::domain::ExternalUserId;
///
/// let id = ExternalUserId::new("octocat").expect("valid id");
/// assert_eq!(id.as_ref(), "octocat");
/// assert!(ExternalUserId::new("a/b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExternalUserId(String);

impl ExternalUserId {
    /// Validate and construct an id from borrowed or owned input.
    pub fn new(id: impl Into<String>) -> Result<Self, ExternalUserIdValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ExternalUserIdValidationError::Empty);
        }
        if id.trim() != id {
            return Err(ExternalUserIdValidationError::SurroundingWhitespace);
        }
        if id.contains('/') {
            return Err(ExternalUserIdValidationError::ContainsSlash);
        }
        // URL builders collapse these instead of encoding them.
        if matches!(id.as_str(), "." | "..") {
            return Err(ExternalUserIdValidationError::DotSegment);
        }
        if id.chars().count() > EXTERNAL_USER_ID_MAX {
            return Err(ExternalUserIdValidationError::TooLong {
                max: EXTERNAL_USER_ID_MAX,
            });
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for ExternalUserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ExternalUserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ExternalUserId> for String {
    fn from(value: ExternalUserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for ExternalUserId {
    type Error = ExternalUserIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Upstream user profile, reduced to what the event builder reads.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExternalUserProfile {
    /// Numeric upstream identifier.
    pub id: u64,
    /// Upstream login (username).
    pub login: String,
    /// Display name; upstream reports `null` for users who never set one.
    pub name: Option<String>,
    /// Public email; `null` when hidden.
    pub email: Option<String>,
}

impl ExternalUserProfile {
    /// The login as an [`ExternalUserId`] for follow-up lookups.
    ///
    /// # Errors
    ///
    /// Fails when upstream hands back a login that cannot be used in a path.
    pub fn login_id(&self) -> Result<ExternalUserId, ExternalUserIdValidationError> {
        ExternalUserId::new(self.login.clone())
    }
}

/// One follower entry; only the login is consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalFollower {
    /// Follower's upstream login.
    pub login: String,
}

/// One repository entry; only the name is consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalRepo {
    /// Repository name without the owner prefix.
    pub name: String,
}
