//! User Service Library
//!
//! Account core of the user-management service: credential verification,
//! session tokens, registration and profile updates over a `UserStore`.
//! The binary wraps it with migration, seeding and account commands.

pub mod config;
pub mod infra;
pub mod repository;
pub mod security;
pub mod service;

use std::sync::Arc;

use tracing::info;

use common::AppResult;

use crate::config::UserServiceConfig;
use crate::infra::{Database, Seeder};
use crate::repository::{SeaUserStore, UserStore};
use crate::security::{PasswordHasher, TokenIssuer};
use crate::service::AccountManager;

/// Wire an account service over any store.
pub fn build_account_service(
    config: &UserServiceConfig,
    store: Arc<dyn UserStore>,
) -> AppResult<AccountManager> {
    let hasher = PasswordHasher::new(&config.hashing)?;
    let tokens = TokenIssuer::from_config(&config.jwt)?;
    Ok(AccountManager::new(store, hasher, tokens))
}

/// Connect to the database (applying migrations) and wire the account service.
pub async fn connect(config: &UserServiceConfig) -> AppResult<AccountManager> {
    let db = Database::connect(&config.database).await?;
    let store = Arc::new(SeaUserStore::new(db.get_connection()));
    build_account_service(config, store)
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(config: &UserServiceConfig, action: MigrateAction) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            for (name, applied) in db.migration_status().await? {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Seed roles and, when configured, the initial administrator.
pub async fn run_seed(config: &UserServiceConfig) -> AppResult<()> {
    let db = Database::connect(&config.database).await?;
    db.ping().await?;

    let hasher = PasswordHasher::new(&config.hashing)?;
    Seeder::new(db.get_connection())
        .run(config.seed.as_ref(), &hasher)
        .await?;

    info!("Seeding complete");
    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
