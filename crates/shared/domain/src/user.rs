//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::ROLE_ADMIN;

/// Role referenced by users. Seeded out-of-band, read-mostly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i32,
    /// Stable code, stored upper-case (e.g. "ADMIN", "CUSTOMER")
    pub code: String,
    /// Display name
    pub name: String,
}

impl Role {
    pub fn new(id: i32, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
            name: name.into(),
        }
    }

    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        self.code.eq_ignore_ascii_case(ROLE_ADMIN)
    }

    /// Role code as carried in claims and views.
    pub fn claim_code(&self) -> String {
        self.code.to_lowercase()
    }
}

/// User domain entity
#[derive(Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub name: String,
    pub phone_number: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft delete timestamp (None = active, Some = deleted)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

// Don't expose hash in debug output (security)
impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("phone_number", &self.phone_number)
            .field("password_hash", &"[REDACTED]")
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .field("deleted_at", &self.deleted_at)
            .finish()
    }
}

impl User {
    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Check if user is active (not deleted)
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// Fields of a user about to be inserted.
///
/// The role is referenced by code; the store resolves it.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub password_hash: String,
    pub role_code: String,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("phone_number", &self.phone_number)
            .field("password_hash", &"[REDACTED]")
            .field("role_code", &self.role_code)
            .finish()
    }
}

/// Mutable profile fields written by an update. Every field is replaced.
#[derive(Clone, PartialEq, Eq)]
pub struct UserChanges {
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub password_hash: String,
}

impl std::fmt::Debug for UserChanges {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserChanges")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("phone_number", &self.phone_number)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}
