//! Account service - login, registration and profile updates.
//!
//! Each operation is one independent unit of work over the user store.
//! Uniqueness pre-checks give friendly errors early; the store's own
//! constraints remain authoritative and surface as the same conflict kinds.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{
    AccountView, LoginRequest, LoginResponse, NewUser, RegisterRequest, SessionClaims,
    UpdateRequest, UserChanges, DEFAULT_ROLE_CODE,
};

use crate::repository::UserStore;
use crate::security::{PasswordHasher, TokenIssuer};

/// Account service trait for dependency injection.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Verify credentials and issue a session token
    async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse>;

    /// Create a new customer account
    async fn register(&self, request: RegisterRequest) -> AppResult<AccountView>;

    /// Replace the profile fields of an existing account
    async fn update(&self, id: Uuid, request: UpdateRequest) -> AppResult<AccountView>;

    /// Project the already-authenticated identity
    fn current(&self, identity: &SessionClaims) -> AccountView;

    /// Get account by UUID
    async fn get_by_uuid(&self, id: Uuid) -> AppResult<AccountView>;
}

/// Concrete implementation of AccountService over a user store.
pub struct AccountManager {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
}

impl AccountManager {
    /// Create new account service instance
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher, tokens: TokenIssuer) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    /// Whether an active user already holds `username`.
    ///
    /// Store failures propagate instead of reading as "does not exist".
    pub async fn is_username_taken(&self, username: &str) -> AppResult<bool> {
        Ok(self.store.find_by_username(username).await?.is_some())
    }

    /// Whether an active user already holds `email`.
    pub async fn is_email_taken(&self, email: &str) -> AppResult<bool> {
        Ok(self.store.find_by_email(email).await?.is_some())
    }

    /// Username conflict unless it is free or owned by `owner`.
    async fn ensure_username_available(&self, username: &str, owner: Uuid) -> AppResult<()> {
        match self.store.find_by_username(username).await? {
            Some(other) if other.id != owner => {
                warn!(%owner, "Username is already taken");
                Err(AppError::UsernameConflict)
            }
            _ => Ok(()),
        }
    }

    /// Email conflict unless it is free or owned by `owner`.
    async fn ensure_email_available(&self, email: &str, owner: Uuid) -> AppResult<()> {
        match self.store.find_by_email(email).await? {
            Some(other) if other.id != owner => {
                warn!(%owner, "Email is already taken");
                Err(AppError::EmailConflict)
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl AccountService for AccountManager {
    async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        let user = match self.store.find_by_username(&request.username).await? {
            Some(user) => user,
            None => {
                warn!("username is not found");
                return Err(AppError::NotFound);
            }
        };

        if !self.hasher.verify(&user.password_hash, &request.password)? {
            warn!(user_id = %user.id, "password incorrect");
            return Err(AppError::InvalidCredentials);
        }

        let view = AccountView::from(&user);
        let claims = self.tokens.claims_for(view.clone(), Utc::now());
        let token = self.tokens.issue(&claims)?;

        Ok(LoginResponse { user: view, token })
    }

    async fn register(&self, request: RegisterRequest) -> AppResult<AccountView> {
        if self.is_username_taken(&request.username).await? {
            warn!("Registration rejected: username already exists");
            return Err(AppError::UsernameConflict);
        }

        if self.is_email_taken(&request.email).await? {
            warn!("Registration rejected: email already exists");
            return Err(AppError::EmailConflict);
        }

        if !request.passwords_match() {
            return Err(AppError::PasswordMismatch);
        }

        let password_hash = self.hasher.hash(&request.password)?;

        // Role is fixed server-side; callers cannot choose it.
        let user = self
            .store
            .insert(NewUser {
                name: request.name,
                username: request.username,
                email: request.email,
                phone_number: request.phone_number,
                password_hash,
                role_code: DEFAULT_ROLE_CODE.to_string(),
            })
            .await?;

        info!(user_id = %user.id, "Account registered");
        Ok(AccountView::from(user))
    }

    async fn update(&self, id: Uuid, request: UpdateRequest) -> AppResult<AccountView> {
        let user = self.store.find_by_uuid(id).await?.ok_or_not_found()?;

        if request.username != user.username {
            self.ensure_username_available(&request.username, user.id)
                .await?;
        }

        if request.email != user.email {
            self.ensure_email_available(&request.email, user.id).await?;
        }

        if !request.passwords_match() {
            return Err(AppError::PasswordMismatch);
        }

        // Always rehash what was submitted, even if unchanged.
        let password_hash = self.hasher.hash(&request.password)?;

        let updated = self
            .store
            .update(
                user.id,
                UserChanges {
                    name: request.name,
                    username: request.username,
                    email: request.email,
                    phone_number: request.phone_number,
                    password_hash,
                },
            )
            .await?;

        info!(user_id = %user.id, "Account updated");
        Ok(AccountView {
            uuid: user.id,
            ..AccountView::from(updated)
        })
    }

    fn current(&self, identity: &SessionClaims) -> AccountView {
        identity.account().clone()
    }

    async fn get_by_uuid(&self, id: Uuid) -> AppResult<AccountView> {
        match self.store.find_by_uuid(id).await? {
            Some(user) => Ok(AccountView::from(user)),
            None => {
                warn!(user_id = %id, "user not found");
                Err(AppError::NotFound)
            }
        }
    }
}
