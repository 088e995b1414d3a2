//! Accounts and login results.

use serde::{Deserialize, Serialize};

use crate::types::{UserId, UserRole};

/// A customer or administrator account as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// Profile picture path relative to the upload host.
    #[serde(default, alias = "profilePicture", alias = "avatar_url")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub role: UserRole,
}

impl User {
    /// Initials for the avatar placeholder ("Jane Doe" -> "JD").
    #[must_use]
    pub fn initials(&self) -> String {
        let initials: String = self
            .name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect();
        if initials.is_empty() {
            "?".to_string()
        } else {
            initials
        }
    }
}

/// Successful login or registration: a bearer token plus the account.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    #[serde(alias = "access_token", alias = "accessToken")]
    pub token: String,
    pub user: User,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user(name: &str) -> User {
        User {
            id: UserId::new(1),
            name: name.to_string(),
            email: "jane@example.com".to_string(),
            phone: None,
            avatar: None,
            role: UserRole::Customer,
        }
    }

    #[test]
    fn test_initials() {
        assert_eq!(user("Jane Doe").initials(), "JD");
        assert_eq!(user("cher").initials(), "C");
        assert_eq!(user("Anna Maria Smith").initials(), "AM");
        assert_eq!(user("   ").initials(), "?");
    }

    #[test]
    fn test_auth_session_accepts_access_token_alias() {
        let json = r#"{"access_token": "abc", "user": {"id": 5, "name": "Jane", "role": "admin"}}"#;
        let session: AuthSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.token, "abc");
        assert!(session.user.role.is_admin());
    }
}
