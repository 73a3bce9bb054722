//! # Identity Types
//!
//! Users of the ordering platform, keyed by email in the `users`
//! collection. Roles are read fresh from the store on every admin-gated
//! request, never cached in tokens.

use serde::{Deserialize, Serialize};

/// Role held by an identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Standard,
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Role::Standard
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Standard => "standard",
            Role::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Store-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Unique, case-sensitive email (lookup key)
    pub email: String,

    /// Display name (opaque profile field)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Role, `standard` unless an admin promoted this identity
    #[serde(default)]
    pub role: Role,
}

impl Identity {
    /// Create a new standard identity (registration path)
    pub fn new(email: impl Into<String>, name: Option<String>) -> Self {
        Self {
            id: None,
            email: email.into(),
            name,
            role: Role::Standard,
        }
    }

    /// Builder: set role
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_role_is_standard() {
        let user = Identity::new("amy@example.com", Some("Amy".into()));
        assert_eq!(user.role, Role::Standard);
        assert!(!user.is_admin());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"standard\"").unwrap(),
            Role::Standard
        );
    }
}
