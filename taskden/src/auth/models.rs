use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, name: Option<String>, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            name,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// Email and plaintext password as submitted by a client.
///
/// Transient: the plaintext is dropped once it has been hashed or verified
/// and is never persisted. Fields are optional because presence is checked
/// at the service boundary, not assumed.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

// The plaintext must never reach logs, so Debug redacts it.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Outcome of a successful signup or login, handed to the transport layer.
///
/// `token` is `None` when the caller's presented session is still fresh
/// enough; identity fields are populated either way so non-token cookies can
/// be re-emitted.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub user_id: String,
    pub display_name: String,
    pub token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_empty() {
        let user = User::new("a@x.com".to_string(), None, "hash".to_string());
        assert_eq!(user.display_name(), "");

        let named = User::new(
            "b@x.com".to_string(),
            Some("Jane".to_string()),
            "hash".to_string(),
        );
        assert_eq!(named.display_name(), "Jane");
    }

    #[test]
    fn test_new_users_get_distinct_ids() {
        let a = User::new("a@x.com".to_string(), None, "hash".to_string());
        let b = User::new("a@x.com".to_string(), None, "hash".to_string());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials {
            email: Some("a@x.com".to_string()),
            password: Some("secret1".to_string()),
        };
        let rendered = format!("{:?}", creds);
        assert!(!rendered.contains("secret1"));
        assert!(rendered.contains("a@x.com"));
    }
}
