//! User identity: profiles, roles, and the reference shape tasks carry.

use serde::{Deserialize, Serialize};

use crate::types::UserId;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Role names as the backend serializes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    Manager,
    Developer,
    Designer,
}

impl Role {
    /// Wire / display name for the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Manager => "manager",
            Role::Developer => "developer",
            Role::Designer => "designer",
        }
    }

    /// Admins bypass the assignment-based visibility rule.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

// ---------------------------------------------------------------------------
// User profile
// ---------------------------------------------------------------------------

/// A full user profile as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Unique contact address. Used for display and as the matching fallback
    /// when a task reference carries no user id (see [`UserRef::matches`]).
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl User {
    /// The identity triple handed to filtering and permission checks.
    pub fn viewer(&self) -> Viewer {
        Viewer {
            id: self.id.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// The signed-in user's identity as consumed by the aggregation engine and
/// the permission predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub id: UserId,
    pub email: String,
    pub role: Role,
}

impl Viewer {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

// ---------------------------------------------------------------------------
// UserRef
// ---------------------------------------------------------------------------

/// How a task refers to a user on the wire: a bare email string or an
/// embedded profile snapshot. The backend is inconsistent about which form
/// it returns, so both deserialize transparently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Email(String),
    Snapshot(UserSnapshot),
}

/// Partial profile embedded in tasks, comments, and history entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl UserRef {
    /// The referenced email, whatever the wire shape.
    pub fn email(&self) -> &str {
        match self {
            UserRef::Email(email) => email,
            UserRef::Snapshot(snapshot) => &snapshot.email,
        }
    }

    /// The referenced user id, when the wire shape carried one.
    pub fn id(&self) -> Option<&str> {
        match self {
            UserRef::Email(_) => None,
            UserRef::Snapshot(snapshot) => snapshot.id.as_deref(),
        }
    }

    /// Whether this reference points at `viewer`.
    ///
    /// Compares by user id when the reference carries one; otherwise falls
    /// back to exact, case-sensitive email equality (the backend does not
    /// normalize email case).
    pub fn matches(&self, viewer: &Viewer) -> bool {
        match self.id() {
            Some(id) => id == viewer.id,
            None => self.email() == viewer.email,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
