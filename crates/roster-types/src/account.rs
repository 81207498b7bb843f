//! Account and session types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Login credentials, used once per attempt and never persisted.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Manual impl so the password can never leak through debug logging.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Access/refresh token pair returned by the login and register endpoints.
///
/// The access token is attached to every authenticated request. The refresh
/// token is persisted alongside it but is not exchanged for new access
/// tokens; a stale session is only discovered through a 401.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived credential attached to authenticated requests.
    pub access: String,
    /// Longer-lived credential, stored but currently dormant.
    pub refresh: String,
}

/// Read-only view of the signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub date_joined: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: token pair deserializes from the backend's field order.
    #[test]
    fn test_token_pair_deserialize() {
        let json = r#"{"refresh":"long-lived","access":"short-lived"}"#;
        let pair: TokenPair = serde_json::from_str(json).unwrap();
        assert_eq!(pair.access, "short-lived");
        assert_eq!(pair.refresh, "long-lived");
    }

    /// Test: profile tolerates absent optional fields.
    #[test]
    fn test_user_profile_optional_fields_default() {
        let json = r#"{
            "id": 7,
            "username": "mira",
            "email": "mira@example.com",
            "first_name": "Mira",
            "last_name": "Kovach",
            "phone": "+380501112233"
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.id, 7);
        assert!(profile.image.is_none());
        assert!(profile.date_joined.is_none());
    }

    /// Test: profile picks up image and join date when present.
    #[test]
    fn test_user_profile_full() {
        let json = r#"{
            "id": 7,
            "username": "mira",
            "email": "mira@example.com",
            "first_name": "Mira",
            "last_name": "Kovach",
            "phone": "+380501112233",
            "image": "/media/avatars/mira.webp",
            "date_joined": "2025-11-02T09:14:00Z"
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.image.as_deref(), Some("/media/avatars/mira.webp"));
        assert_eq!(profile.date_joined.as_deref(), Some("2025-11-02T09:14:00Z"));
    }

    /// Test: debug output never contains the password.
    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("mira", "hunter2-secret");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("mira"));
        assert!(!rendered.contains("hunter2-secret"));
    }
}
