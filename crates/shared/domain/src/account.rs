//! Account request/response types and session claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::User;

/// Public-safe projection of a user, returned to callers and embedded in tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub uuid: Uuid,
    pub name: String,
    pub username: String,
    pub phone_number: String,
    pub email: String,
    /// Lower-cased role code
    pub role: String,
}

impl From<&User> for AccountView {
    fn from(user: &User) -> Self {
        Self {
            uuid: user.id,
            name: user.name.clone(),
            username: user.username.clone(),
            phone_number: user.phone_number.clone(),
            email: user.email.clone(),
            role: user.role.claim_code(),
        }
    }
}

impl From<User> for AccountView {
    fn from(user: User) -> Self {
        let role = user.role.claim_code();
        Self {
            uuid: user.id,
            name: user.name,
            username: user.username,
            phone_number: user.phone_number,
            email: user.email,
            role,
        }
    }
}

/// Claims carried by a signed session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(flatten)]
    pub user: AccountView,
    /// Absolute expiration (unix seconds)
    pub exp: i64,
    /// Issued at (unix seconds)
    pub iat: i64,
}

impl SessionClaims {
    /// Build claims for `user`, valid from `issued_at` for `ttl`.
    pub fn new(user: AccountView, issued_at: DateTime<Utc>, ttl: chrono::Duration) -> Self {
        Self {
            user,
            exp: (issued_at + ttl).timestamp(),
            iat: issued_at.timestamp(),
        }
    }

    /// Identity the claims were issued for.
    pub fn account(&self) -> &AccountView {
        &self.user
    }
}

/// Login credentials. Exists only for the duration of a login call.
#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Successful login: the account and a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: AccountView,
    pub token: String,
}

/// Registration input. The role is never accepted from the caller.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub email: String,
    pub phone_number: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("email", &self.email)
            .field("phone_number", &self.phone_number)
            .finish()
    }
}

/// Profile update input. All fields are required and replace the stored ones.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub name: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub email: String,
    pub phone_number: String,
}

impl std::fmt::Debug for UpdateRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateRequest")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("email", &self.email)
            .field("phone_number", &self.phone_number)
            .finish()
    }
}

impl RegisterRequest {
    pub fn passwords_match(&self) -> bool {
        self.password == self.confirm_password
    }
}

impl UpdateRequest {
    pub fn passwords_match(&self) -> bool {
        self.password == self.confirm_password
    }
}
