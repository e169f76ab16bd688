//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use common::{AppError, AppResult};
use domain::User;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Unique among active rows (partial index)
    pub username: String,
    /// Unique among active rows (partial index)
    pub email: String,
    pub name: String,
    pub phone_number: String,
    pub password_hash: String,
    pub role_id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    /// Soft delete timestamp (NULL = active, set = deleted)
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::role::Entity",
        from = "Column::RoleId",
        to = "super::role::Column::Id"
    )]
    Role,
}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Role.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert a user row and its joined role into the domain entity.
pub fn into_domain(model: Model, role: Option<super::role::Model>) -> AppResult<User> {
    let role = role.ok_or_else(|| {
        AppError::internal(format!("User {} references missing role {}", model.id, model.role_id))
    })?;

    Ok(User {
        id: model.id,
        username: model.username,
        email: model.email,
        name: model.name,
        phone_number: model.phone_number,
        password_hash: model.password_hash,
        role: role.into(),
        created_at: model.created_at,
        updated_at: model.updated_at,
        deleted_at: model.deleted_at,
    })
}

/// Partial unique index over active usernames.
pub const USERNAME_UNIQUE_INDEX: &str = "idx_users_username_active";

/// Partial unique index over active emails.
pub const EMAIL_UNIQUE_INDEX: &str = "idx_users_email_active";
