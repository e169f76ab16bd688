//! Seed data: roles and the initial administrator.

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::info;

use common::AppResult;
use domain::{NewUser, User, ROLE_ADMIN, SEEDED_ROLES};

use crate::config::SeedConfig;
use crate::repository::entities::role::{self, Entity as RoleEntity};
use crate::repository::{SeaUserStore, UserStore};
use crate::security::PasswordHasher;

/// Idempotent seeder. Existing rows are left untouched.
pub struct Seeder {
    db: DatabaseConnection,
}

impl Seeder {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Seed roles, then the administrator when one is configured.
    pub async fn run(&self, admin: Option<&SeedConfig>, hasher: &PasswordHasher) -> AppResult<()> {
        self.seed_roles().await?;
        if let Some(admin) = admin {
            self.seed_admin(admin, hasher).await?;
        }
        Ok(())
    }

    /// Create each seeded role unless its code already exists.
    pub async fn seed_roles(&self) -> AppResult<()> {
        for (code, name) in SEEDED_ROLES {
            let existing = RoleEntity::find()
                .filter(role::Column::Code.eq(*code))
                .one(&self.db)
                .await?;

            if existing.is_none() {
                let now = chrono::Utc::now();
                role::ActiveModel {
                    code: Set(code.to_string()),
                    name: Set(name.to_string()),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.db)
                .await?;
            }
            info!("seeding role {}", code);
        }
        Ok(())
    }

    /// Create the administrator unless the username is already taken.
    pub async fn seed_admin(&self, admin: &SeedConfig, hasher: &PasswordHasher) -> AppResult<User> {
        let store = SeaUserStore::new(self.db.clone());

        if let Some(existing) = store.find_by_username(&admin.username).await? {
            info!("seeding user {} (already present)", existing.username);
            return Ok(existing);
        }

        let user = store
            .insert(NewUser {
                name: admin.name.clone(),
                username: admin.username.clone(),
                email: admin.email.clone(),
                phone_number: admin.phone_number.clone(),
                password_hash: hasher.hash(&admin.password)?,
                role_code: ROLE_ADMIN.to_string(),
            })
            .await?;

        info!("seeding user {}", user.username);
        Ok(user)
    }
}
