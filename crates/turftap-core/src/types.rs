//! Core type definitions for turftap

use crate::error::{Result, TurftapError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a new random identifier
            pub fn new() -> Self {
                $name(Uuid::new_v4())
            }

            /// Parse from a UUID string
            pub fn parse(s: &str) -> Result<Self> {
                s.trim().parse()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = TurftapError;

            fn from_str(s: &str) -> Result<Self> {
                Uuid::parse_str(s).map($name).map_err(|_| {
                    TurftapError::Validation(format!("Invalid {} ID: {}", $label, s))
                })
            }
        }
    };
}

define_id!(
    /// Unique identifier for a user
    UserId,
    "user"
);

define_id!(
    /// Unique identifier for a listed sports ground
    ListingId,
    "listing"
);

define_id!(
    /// Unique identifier for a comment
    CommentId,
    "comment"
);

/// Role of an identity, resolved outside the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Member,
    Admin,
}

impl Role {
    /// Whether this role may moderate other users' content
    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Member => write!(f, "member"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for Role {
    type Err = TurftapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "member" | "user" => Ok(Role::Member),
            "admin" => Ok(Role::Admin),
            other => Err(TurftapError::Validation(format!("Unknown role: {}", other))),
        }
    }
}

/// An authenticated caller, as resolved by the identity provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: UserId,
    #[serde(default)]
    pub role: Role,
}

impl Identity {
    /// Identity with the default member role
    pub fn member(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Member,
        }
    }

    /// Identity holding the admin role
    pub fn admin(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Admin,
        }
    }

    pub fn is_privileged(&self) -> bool {
        self.role.is_privileged()
    }
}

/// Reject callers without an identity
pub fn require_identity(identity: Option<&Identity>) -> Result<&Identity> {
    identity.ok_or(TurftapError::Unauthorized)
}

/// Reject callers that are not admins
pub fn require_admin(identity: Option<&Identity>) -> Result<&Identity> {
    let identity = require_identity(identity)?;
    if !identity.is_privileged() {
        return Err(TurftapError::Forbidden(
            "admin role required".to_string(),
        ));
    }
    Ok(identity)
}

/// One page of a paginated result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    /// Slice `all` into the requested 1-based page
    pub fn paginate(all: Vec<T>, page: usize, per_page: usize) -> Self {
        let total_items = all.len();
        let total_pages = if per_page == 0 {
            0
        } else {
            total_items.div_ceil(per_page)
        };
        let skip = page.saturating_sub(1).saturating_mul(per_page);
        let items = all.into_iter().skip(skip).take(per_page).collect();
        Self {
            items,
            page,
            total_pages,
            total_items,
        }
    }
}

/// Data format version for compatibility
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolVersion {
    pub major: u32,
    pub minor: u32,
}

impl ProtocolVersion {
    pub const V1_0: Self = Self { major: 1, minor: 0 };

    /// Check if this version is compatible with another version
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.major == other.major
    }

    /// Parse "major.minor"
    pub fn parse(s: &str) -> Option<Self> {
        let (major, minor) = s.split_once('.')?;
        Some(Self {
            major: major.parse().ok()?,
            minor: minor.parse().ok()?,
        })
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::V1_0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_uniqueness() {
        assert_ne!(CommentId::new(), CommentId::new());
    }

    #[test]
    fn test_id_parse() {
        let id = ListingId::new();
        let parsed = ListingId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);

        let err = ListingId::parse("not-a-uuid").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_id_serializes_as_string() {
        let id = UserId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("Member".parse::<Role>().unwrap(), Role::Member);
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_require_identity() {
        assert!(matches!(
            require_identity(None),
            Err(TurftapError::Unauthorized)
        ));
        let member = Identity::member(UserId::new());
        assert!(require_identity(Some(&member)).is_ok());
        assert!(matches!(
            require_admin(Some(&member)),
            Err(TurftapError::Forbidden(_))
        ));
        let admin = Identity::admin(UserId::new());
        assert!(require_admin(Some(&admin)).is_ok());
    }

    #[test]
    fn test_paginate() {
        let page = Page::paginate((1..=25).collect::<Vec<_>>(), 2, 10);
        assert_eq!(page.items, (11..=20).collect::<Vec<_>>());
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 25);

        let beyond = Page::paginate(vec![1, 2, 3], 5, 10);
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total_pages, 1);
    }

    #[test]
    fn test_protocol_version() {
        let v1_0 = ProtocolVersion::V1_0;
        let v1_1 = ProtocolVersion::parse("1.1").unwrap();
        let v2_0 = ProtocolVersion::parse("2.0").unwrap();

        assert!(v1_0.is_compatible(&v1_1));
        assert!(!v1_0.is_compatible(&v2_0));
        assert!(ProtocolVersion::parse("garbage").is_none());
    }
}
