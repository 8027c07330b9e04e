//! User identity used to key per-user editor state.
//!
//! Users are identified by the login string carried in the token subject
//! (usually an email address). Requests without a token act as [`UserId::guest`].

use serde::{Deserialize, Serialize};

/// Identifier of the anonymous user.
pub const GUEST_USER: &str = "Guest";

/// Identity of the user performing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a user identity from a login string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the anonymous user.
    #[must_use]
    pub fn guest() -> Self {
        Self(GUEST_USER.to_string())
    }

    /// Returns true for the anonymous user.
    #[must_use]
    pub fn is_guest(&self) -> bool {
        self.0 == GUEST_USER
    }

    /// Returns the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
