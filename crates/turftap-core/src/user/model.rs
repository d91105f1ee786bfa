//! User data models

use crate::types::{Identity, Role, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered contributor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Unique, compared case-insensitively
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    /// Turftap points earned from approved submissions
    #[serde(default)]
    pub points: u64,
    #[serde(default)]
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a member account
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            email: email.into(),
            profile_image: None,
            points: 0,
            role: Role::Member,
            created_at: Utc::now(),
        }
    }

    /// The identity this user acts with
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.id,
            role: self.role,
        }
    }

    /// Case-insensitive email comparison
    pub fn has_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }

    /// Display fields attached to comments
    pub fn author_summary(&self) -> AuthorSummary {
        AuthorSummary {
            id: self.id,
            name: self.name.clone(),
            image: self.profile_image.clone(),
        }
    }
}

/// Author display fields resolved onto comments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: UserId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Entry in the top contributors ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorSummary {
    pub id: UserId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    pub points: u64,
}

impl From<&User> for ContributorSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            profile_image: user.profile_image.clone(),
            points: user.points,
        }
    }
}

/// Sign-in payload from the identity provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub profile_image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new("Meera", "meera@example.com");
        assert_eq!(user.points, 0);
        assert_eq!(user.role, Role::Member);
        assert_eq!(user.identity().user_id, user.id);
        assert!(!user.identity().is_privileged());
    }

    #[test]
    fn test_has_email_ignores_case() {
        let user = User::new("Meera", "Meera@Example.com");
        assert!(user.has_email("meera@example.com"));
        assert!(user.has_email("  MEERA@EXAMPLE.COM "));
        assert!(!user.has_email("other@example.com"));
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let mut user = User::new("Meera", "meera@example.com");
        user.profile_image = Some("https://img.example/m.png".to_string());
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("profileImage"));
        assert!(json.contains("createdAt"));
    }
}
