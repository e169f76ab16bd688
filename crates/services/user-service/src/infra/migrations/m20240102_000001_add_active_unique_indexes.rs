//! Migration: Enforce username/email uniqueness among active users.
//!
//! Partial indexes let a soft-deleted account release its username and email.

use sea_orm_migration::prelude::*;

use crate::repository::entities::user::{EMAIL_UNIQUE_INDEX, USERNAME_UNIQUE_INDEX};

use super::m20240101_000002_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // sea-query has no builder for partial indexes
        for (index, column) in [
            (USERNAME_UNIQUE_INDEX, "username"),
            (EMAIL_UNIQUE_INDEX, "email"),
        ] {
            db.execute_unprepared(&format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS {index} ON users ({column}) \
                 WHERE deleted_at IS NULL"
            ))
            .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for index in [USERNAME_UNIQUE_INDEX, EMAIL_UNIQUE_INDEX] {
            manager
                .drop_index(Index::drop().name(index).table(Users::Table).to_owned())
                .await?;
        }

        Ok(())
    }
}
