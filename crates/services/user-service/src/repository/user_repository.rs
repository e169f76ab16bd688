//! User store contract and its SeaORM implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    SqlErr,
};
use tracing::warn;
use uuid::Uuid;

use super::entities::role::{self, Entity as RoleEntity};
use super::entities::user::{
    self, ActiveModel, Entity as UserEntity, EMAIL_UNIQUE_INDEX, USERNAME_UNIQUE_INDEX,
};
use common::{AppError, AppResult};
use domain::{NewUser, User, UserChanges};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Storage contract required by the account service.
///
/// Lookups only see active (non-deleted) users and return `Ok(None)` when
/// nothing matches. Writes report uniqueness violations as
/// `UsernameConflict` / `EmailConflict`; the store is the authority on
/// uniqueness, whatever the caller checked beforehand.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find active user by username
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Find active user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find active user by UUID
    async fn find_by_uuid(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Insert a new user, resolving its role by code
    async fn insert(&self, user: NewUser) -> AppResult<User>;

    /// Replace the mutable fields of an active user
    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User>;
}

/// PostgreSQL-backed user store.
pub struct SeaUserStore {
    db: DatabaseConnection,
}

impl SeaUserStore {
    /// Create new store instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_active(
        &self,
        filter: impl sea_orm::sea_query::IntoCondition + Send,
    ) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(filter)
            .filter(user::Column::DeletedAt.is_null())
            .find_also_related(RoleEntity)
            .one(&self.db)
            .await?;

        result
            .map(|(model, role)| user::into_domain(model, role))
            .transpose()
    }
}

#[async_trait]
impl UserStore for SeaUserStore {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.find_active(user::Column::Username.eq(username)).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.find_active(user::Column::Email.eq(email)).await
    }

    async fn find_by_uuid(&self, id: Uuid) -> AppResult<Option<User>> {
        self.find_active(user::Column::Id.eq(id)).await
    }

    async fn insert(&self, new_user: NewUser) -> AppResult<User> {
        let role = RoleEntity::find()
            .filter(role::Column::Code.eq(new_user.role_code.as_str()))
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                AppError::internal(format!("Role {} has not been seeded", new_user.role_code))
            })?;

        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(new_user.username),
            email: Set(new_user.email),
            name: Set(new_user.name),
            phone_number: Set(new_user.phone_number),
            password_hash: Set(new_user.password_hash),
            role_id: Set(role.id),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        let model = active_model.insert(&self.db).await.map_err(map_write_error)?;
        user::into_domain(model, Some(role))
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        // Only allow updating active (non-deleted) users
        let existing = UserEntity::find_by_id(id)
            .filter(user::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        active.name = Set(changes.name);
        active.username = Set(changes.username);
        active.email = Set(changes.email);
        active.phone_number = Set(changes.phone_number);
        active.password_hash = Set(changes.password_hash);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(map_write_error)?;
        let role = RoleEntity::find_by_id(model.role_id).one(&self.db).await?;
        user::into_domain(model, role)
    }
}

/// Translate unique-index violations into conflict kinds.
fn map_write_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            conflict_from_detail(&detail).unwrap_or_else(|| AppError::Store(err))
        }
        _ => AppError::Store(err),
    }
}

/// Conflict kind named by a unique-violation message, if it is one of ours.
fn conflict_from_detail(detail: &str) -> Option<AppError> {
    if detail.contains(USERNAME_UNIQUE_INDEX) {
        warn!("Write rejected by username unique index");
        Some(AppError::UsernameConflict)
    } else if detail.contains(EMAIL_UNIQUE_INDEX) {
        warn!("Write rejected by email unique index");
        Some(AppError::EmailConflict)
    } else {
        None
    }
}
