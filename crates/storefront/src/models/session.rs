//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use emporium_core::{User, UserId};

/// Session-stored customer identity.
///
/// Display data only. The backend re-checks the bearer token on every call,
/// so nothing here is trusted for authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Absolute profile picture URL.
    pub avatar: Option<String>,
}

impl CurrentUser {
    /// Turn the backend's relative avatar path into a URL the browser can load.
    #[must_use]
    pub fn resolve_avatar(mut self, resolve: impl FnOnce(&str) -> String) -> Self {
        self.avatar = self.avatar.as_deref().map(resolve);
        self
    }

    /// Initials for the avatar placeholder.
    #[must_use]
    pub fn initials(&self) -> String {
        User::from(self.clone()).initials()
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

impl From<CurrentUser> for User {
    fn from(user: CurrentUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: None,
            avatar: user.avatar,
            role: emporium_core::UserRole::Customer,
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in customer.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the backend bearer token.
    pub const API_TOKEN: &str = "api_token";
}
