//! Caller identity and visibility scope.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Privilege level of the acting user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Member,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "member" | "user" => Ok(Self::Member),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unsupported role `{other}`; expected member|admin")),
        }
    }
}

/// Row visibility passed to the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    /// Only rows owned by this user.
    Owner(String),
    /// Every row.
    All,
}

/// The user on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
    pub role: Role,
}

impl Caller {
    pub fn member(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: Role::Member,
        }
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn scope(&self) -> ListScope {
        if self.is_admin() {
            ListScope::All
        } else {
            ListScope::Owner(self.user_id.clone())
        }
    }

    /// Whether this caller may read or mutate a row owned by `owner`.
    pub fn can_access(&self, owner: &str) -> bool {
        self.is_admin() || self.user_id == owner
    }
}

#[cfg(test)]
mod tests {
    use super::{Caller, ListScope, Role};

    #[test]
    fn admin_sees_all_rows_and_member_only_own() {
        assert_eq!(Caller::admin("root").scope(), ListScope::All);
        assert_eq!(
            Caller::member("ada").scope(),
            ListScope::Owner("ada".to_string())
        );
        assert!(Caller::admin("root").can_access("ada"));
        assert!(!Caller::member("bob").can_access("ada"));
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("owner".parse::<Role>().is_err());
    }
}
