//! Session domain model.

use serde::{Deserialize, Serialize};

/// Role name that is routed to the results view instead of the wizard.
pub const ADMIN_ROLE: &str = "admin";

/// The signed-in user as returned by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub role: String,
    /// Team leader recorded on every submission
    #[serde(default)]
    pub leader: Option<String>,
    #[serde(default)]
    pub assigned_stores: Vec<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// Access/refresh token pair issued by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Cached credentials: two tokens and the decoded user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

impl Session {
    pub fn new(tokens: TokenPair, user: User) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            user,
        }
    }

    /// Returns a copy carrying freshly issued tokens and user.
    pub fn refreshed(tokens: TokenPair, user: User) -> Self {
        Self::new(tokens, user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_uses_camel_case_keys() {
        let json = r#"{
            "accessToken": "a",
            "refreshToken": "r",
            "user": {"username": "lan", "role": "user", "leader": "Minh", "assignedStores": ["S001"]}
        }"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.access_token, "a");
        assert_eq!(session.user.leader.as_deref(), Some("Minh"));
        assert_eq!(session.user.assigned_stores, vec!["S001".to_string()]);
        assert!(!session.user.is_admin());
    }

    #[test]
    fn test_missing_optional_user_fields_default() {
        let user: User = serde_json::from_str(r#"{"username": "root", "role": "admin"}"#).unwrap();
        assert!(user.is_admin());
        assert!(user.leader.is_none());
        assert!(user.assigned_stores.is_empty());
    }
}
