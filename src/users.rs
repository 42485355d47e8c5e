//! Users

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::TypedUuid;

/// User identifier
pub type UserId = TypedUuid<User>;

/// Role granted to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular shopper
    #[default]
    User,

    /// Catalog and order administrator
    Admin,
}

impl Role {
    /// Database and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown role name
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// User
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User UUID
    pub id: UserId,

    /// Login name
    pub username: String,

    /// Granted role
    pub role: Role,
}

impl User {
    /// Whether the user may act on resources owned by `owner`.
    pub fn can_access(&self, owner: UserId) -> bool {
        self.role == Role::Admin || self.id == owner
    }

    /// Whether the user is an administrator.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_known_names() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("user".parse::<Role>(), Ok(Role::User));
        assert_eq!(
            "root".parse::<Role>(),
            Err(UnknownRole("root".to_string()))
        );
    }

    #[test]
    fn owners_and_admins_can_access() {
        let owner = User {
            id: UserId::new(),
            username: "alice".to_string(),
            role: Role::User,
        };

        let stranger = User {
            id: UserId::new(),
            username: "bob".to_string(),
            role: Role::User,
        };

        let admin = User {
            id: UserId::new(),
            username: "root".to_string(),
            role: Role::Admin,
        };

        assert!(owner.can_access(owner.id));
        assert!(!stranger.can_access(owner.id));
        assert!(admin.can_access(owner.id));
    }
}
