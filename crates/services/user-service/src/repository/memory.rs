//! In-memory user store.
//!
//! Holds users and seeded roles behind one async lock, so every uniqueness
//! check and the write it guards happen atomically. Used for tests and
//! embedding without a database.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{NewUser, Role, User, UserChanges, SEEDED_ROLES};

use super::UserStore;

#[derive(Default)]
struct Tables {
    roles: Vec<Role>,
    users: HashMap<Uuid, User>,
}

impl Tables {
    fn active(&self) -> impl Iterator<Item = &User> + Clone {
        self.users.values().filter(|u| u.is_active())
    }

    /// Conflict against any active user other than `except`.
    fn check_unique(&self, username: &str, email: &str, except: Option<Uuid>) -> AppResult<()> {
        let mut others = self.active().filter(|u| Some(u.id) != except);

        if others.clone().any(|u| u.username == username) {
            return Err(AppError::UsernameConflict);
        }
        if others.any(|u| u.email == email) {
            return Err(AppError::EmailConflict);
        }
        Ok(())
    }
}

/// User store kept in process memory.
pub struct InMemoryUserStore {
    tables: RwLock<Tables>,
}

impl InMemoryUserStore {
    /// Create a store with the standard roles seeded.
    pub fn new() -> Self {
        let roles = SEEDED_ROLES
            .iter()
            .zip(1..)
            .map(|((code, name), id)| Role::new(id, *code, *name))
            .collect();

        Self {
            tables: RwLock::new(Tables {
                roles,
                users: HashMap::new(),
            }),
        }
    }

    /// Number of stored users, deleted ones included.
    pub async fn len(&self) -> usize {
        self.tables.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Insert a user directly under the given role code, bypassing the
    /// account service. Intended for seeding.
    pub async fn seed(&self, user: NewUser) -> AppResult<User> {
        self.insert(user).await
    }

    /// Mark a user deleted. Its username and email become free again.
    pub async fn soft_delete(&self, id: Uuid) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(&id)
            .filter(|u| u.is_active())
            .ok_or(AppError::NotFound)?;

        let now = Utc::now();
        user.deleted_at = Some(now);
        user.updated_at = now;
        Ok(())
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        let user = tables.active().find(|u| u.username == username).cloned();
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        let user = tables.active().find(|u| u.email == email).cloned();
        Ok(user)
    }

    async fn find_by_uuid(&self, id: Uuid) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).filter(|u| u.is_active()).cloned())
    }

    async fn insert(&self, new_user: NewUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        tables.check_unique(&new_user.username, &new_user.email, None)?;

        let role = tables
            .roles
            .iter()
            .find(|r| r.code == new_user.role_code)
            .cloned()
            .ok_or_else(|| {
                AppError::internal(format!("Role {} has not been seeded", new_user.role_code))
            })?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            name: new_user.name,
            phone_number: new_user.phone_number,
            password_hash: new_user.password_hash,
            role,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if !tables.users.get(&id).is_some_and(User::is_active) {
            return Err(AppError::NotFound);
        }
        tables.check_unique(&changes.username, &changes.email, Some(id))?;

        let user = tables.users.get_mut(&id).ok_or(AppError::NotFound)?;
        user.name = changes.name;
        user.username = changes.username;
        user.email = changes.email;
        user.phone_number = changes.phone_number;
        user.password_hash = changes.password_hash;
        user.updated_at = Utc::now();

        Ok(user.clone())
    }
}
