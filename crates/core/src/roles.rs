//! Roles and the capability sets they grant.
//!
//! Authorization is checked against [`Capability`] values at the route
//! boundary instead of comparing role strings inline. `admin` is a strict
//! superset of `editor`.

use std::fmt;
use std::str::FromStr;

/// Staff role attached to every user account and JWT claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Editor,
}

/// A single permission checked at route dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Create and update films, productions, stories, settings, uploads.
    ManageContent,
    /// Delete films, productions, stories. Admin only.
    DeleteContent,
    /// Create, update, delete user accounts. Admin only.
    ManageUsers,
    /// List, update, delete subscribers and run campaigns. Admin only.
    ManageSubscribers,
    /// Read the activity feed and dashboard stats. Admin only.
    ViewActivity,
}

impl Role {
    pub const ADMIN: &'static str = "admin";
    pub const EDITOR: &'static str = "editor";

    /// Whether this role grants the given capability.
    pub fn grants(self, capability: Capability) -> bool {
        match self {
            Role::Admin => true,
            Role::Editor => matches!(capability, Capability::ManageContent),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => Self::ADMIN,
            Role::Editor => Self::EDITOR,
        }
    }

    /// All role names accepted on user create/update input.
    pub fn all_names() -> &'static [&'static str] {
        &[Self::ADMIN, Self::EDITOR]
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::ADMIN => Ok(Role::Admin),
            Self::EDITOR => Ok(Role::Editor),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
