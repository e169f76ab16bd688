//! Account service tests against the in-memory store.

use std::sync::Arc;

use uuid::Uuid;

use common::{AppError, DatabaseConfig, HashingConfig, JwtConfig};
use domain::{
    AccountView, LoginRequest, NewUser, RegisterRequest, UpdateRequest, ROLE_ADMIN,
};
use user_service_lib::repository::{InMemoryUserStore, UserStore};
use user_service_lib::security::{PasswordHasher, TokenIssuer};
use user_service_lib::build_account_service;
use user_service_lib::config::UserServiceConfig;
use user_service_lib::service::{AccountManager, AccountService};

const SECRET: &[u8] = b"test-secret-key-for-testing-only-32chars";

fn hasher() -> PasswordHasher {
    PasswordHasher::new(&HashingConfig {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .unwrap()
}

fn tokens() -> TokenIssuer {
    TokenIssuer::new(SECRET, 60).unwrap()
}

fn setup() -> (Arc<InMemoryUserStore>, AccountManager) {
    let store = Arc::new(InMemoryUserStore::new());
    let service = AccountManager::new(store.clone(), hasher(), tokens());
    (store, service)
}

fn register_request(username: &str, email: &str) -> RegisterRequest {
    RegisterRequest {
        name: "Arvel".to_string(),
        username: username.to_string(),
        password: "arvel123".to_string(),
        confirm_password: "arvel123".to_string(),
        email: email.to_string(),
        phone_number: "0827".to_string(),
    }
}

fn update_from(view: &AccountView) -> UpdateRequest {
    UpdateRequest {
        name: view.name.clone(),
        username: view.username.clone(),
        password: "arvel123".to_string(),
        confirm_password: "arvel123".to_string(),
        email: view.email.clone(),
        phone_number: view.phone_number.clone(),
    }
}

fn login(username: &str, password: &str) -> LoginRequest {
    LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    }
}

// =============================================================================
// Register
// =============================================================================

#[tokio::test]
async fn test_register_into_empty_store() {
    let (store, service) = setup();

    let view = service
        .register(register_request("arvel", "arvel@x.com"))
        .await
        .unwrap();

    assert_eq!(view.username, "arvel");
    assert_eq!(view.name, "Arvel");
    assert_eq!(view.email, "arvel@x.com");
    assert_eq!(view.phone_number, "0827");
    assert_eq!(view.role, "customer");
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_register_stores_hash_not_plaintext() {
    let (store, service) = setup();
    service
        .register(register_request("arvel", "arvel@x.com"))
        .await
        .unwrap();

    let stored = store.find_by_username("arvel").await.unwrap().unwrap();
    assert_ne!(stored.password_hash, "arvel123");
    assert!(hasher().verify(&stored.password_hash, "arvel123").unwrap());
}

#[tokio::test]
async fn test_register_same_username_twice() {
    let (store, service) = setup();
    service
        .register(register_request("arvel", "arvel@x.com"))
        .await
        .unwrap();

    let result = service
        .register(register_request("arvel", "other@x.com"))
        .await;

    assert!(matches!(result, Err(AppError::UsernameConflict)));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_register_same_email_twice() {
    let (store, service) = setup();
    service
        .register(register_request("arvel", "arvel@x.com"))
        .await
        .unwrap();

    let result = service
        .register(register_request("other", "arvel@x.com"))
        .await;

    assert!(matches!(result, Err(AppError::EmailConflict)));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_register_username_conflict_reported_first() {
    let (_, service) = setup();
    service
        .register(register_request("arvel", "arvel@x.com"))
        .await
        .unwrap();

    let mut request = register_request("arvel", "arvel@x.com");
    request.confirm_password = "mismatch".to_string();

    assert!(matches!(
        service.register(request).await,
        Err(AppError::UsernameConflict)
    ));
}

#[tokio::test]
async fn test_register_password_mismatch_leaves_store_untouched() {
    let (store, service) = setup();
    let mut request = register_request("arvel", "arvel@x.com");
    request.confirm_password = "arvel124".to_string();

    let result = service.register(request).await;

    assert!(matches!(result, Err(AppError::PasswordMismatch)));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_register_then_get_by_uuid_round_trip() {
    let (_, service) = setup();
    let registered = service
        .register(register_request("arvel", "arvel@x.com"))
        .await
        .unwrap();

    let fetched = service.get_by_uuid(registered.uuid).await.unwrap();

    assert_eq!(fetched, registered);
}

#[tokio::test]
async fn test_concurrent_registrations_of_one_username() {
    let (store, service) = setup();
    let service = Arc::new(service);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .register(register_request("arvel", &format!("arvel{}@x.com", i)))
                    .await
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(e) => assert!(matches!(e, AppError::UsernameConflict)),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(store.len().await, 1);
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_success_carries_claims() {
    let (_, service) = setup();
    let registered = service
        .register(register_request("arvel", "arvel@x.com"))
        .await
        .unwrap();

    let response = service.login(login("arvel", "arvel123")).await.unwrap();

    assert!(!response.token.is_empty());
    assert_eq!(response.user, registered);

    let claims = tokens().verify(&response.token).unwrap();
    assert_eq!(claims.user.username, "arvel");
    assert_eq!(claims.user.role, "customer");
    assert_eq!(claims.exp - claims.iat, 60 * 60);
}

#[tokio::test]
async fn test_login_role_claim_is_lowercased_stored_role() {
    let (store, service) = setup();
    store
        .seed(NewUser {
            name: "Arvel".to_string(),
            username: "arvel".to_string(),
            email: "arvel@gmail.com".to_string(),
            phone_number: "08273648237".to_string(),
            password_hash: hasher().hash("arvel123").unwrap(),
            role_code: ROLE_ADMIN.to_string(),
        })
        .await
        .unwrap();

    let response = service.login(login("arvel", "arvel123")).await.unwrap();
    let claims = tokens().verify(&response.token).unwrap();

    assert_eq!(claims.user.role, "admin");
    let stored = store.find_by_username("arvel").await.unwrap().unwrap();
    assert_eq!(stored.role.code, "ADMIN");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let (_, service) = setup();
    service
        .register(register_request("arvel", "arvel@x.com"))
        .await
        .unwrap();

    let result = service.login(login("arvel", "wrong")).await;

    assert!(matches!(result, Err(AppError::InvalidCredentials)));
}

#[tokio::test]
async fn test_login_unknown_username() {
    let (_, service) = setup();

    let result = service.login(login("ghost", "arvel123")).await;

    let err = result.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    assert!(err.is_authentication_failure());
}

#[tokio::test]
async fn test_login_does_not_write() {
    let (store, service) = setup();
    let registered = service
        .register(register_request("arvel", "arvel@x.com"))
        .await
        .unwrap();
    let before = store.find_by_uuid(registered.uuid).await.unwrap().unwrap();

    service.login(login("arvel", "arvel123")).await.unwrap();

    let after = store.find_by_uuid(registered.uuid).await.unwrap().unwrap();
    assert_eq!(before.updated_at, after.updated_at);
    assert_eq!(before.password_hash, after.password_hash);
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_phone_only() {
    let (_, service) = setup();
    let registered = service
        .register(register_request("arvel", "arvel@x.com"))
        .await
        .unwrap();

    let mut request = update_from(&registered);
    request.phone_number = "0999".to_string();
    let updated = service.update(registered.uuid, request).await.unwrap();

    assert_eq!(updated.uuid, registered.uuid);
    assert_eq!(updated.phone_number, "0999");
    assert_eq!(updated.username, registered.username);
    assert_eq!(updated.email, registered.email);
    assert_eq!(updated.role, registered.role);
}

#[tokio::test]
async fn test_update_to_other_users_username() {
    let (_, service) = setup();
    service.register(register_request("a", "a@x.com")).await.unwrap();
    let b = service.register(register_request("b", "b@x.com")).await.unwrap();

    let mut request = update_from(&b);
    request.username = "a".to_string();

    assert!(matches!(
        service.update(b.uuid, request).await,
        Err(AppError::UsernameConflict)
    ));
}

#[tokio::test]
async fn test_update_to_other_users_email() {
    let (_, service) = setup();
    service.register(register_request("a", "a@x.com")).await.unwrap();
    let b = service.register(register_request("b", "b@x.com")).await.unwrap();

    let mut request = update_from(&b);
    request.email = "a@x.com".to_string();

    assert!(matches!(
        service.update(b.uuid, request).await,
        Err(AppError::EmailConflict)
    ));
}

#[tokio::test]
async fn test_update_keeping_own_username_and_email() {
    let (_, service) = setup();
    let registered = service
        .register(register_request("arvel", "arvel@x.com"))
        .await
        .unwrap();

    let result = service
        .update(registered.uuid, update_from(&registered))
        .await;

    assert_eq!(result.unwrap(), registered);
}

#[tokio::test]
async fn test_update_password_mismatch() {
    let (_, service) = setup();
    let registered = service
        .register(register_request("arvel", "arvel@x.com"))
        .await
        .unwrap();

    let mut request = update_from(&registered);
    request.name = "Changed".to_string();
    request.confirm_password = "different".to_string();

    assert!(matches!(
        service.update(registered.uuid, request).await,
        Err(AppError::PasswordMismatch)
    ));
    assert_eq!(service.get_by_uuid(registered.uuid).await.unwrap().name, "Arvel");
}

#[tokio::test]
async fn test_update_rehashes_and_changes_login_password() {
    let (store, service) = setup();
    let registered = service
        .register(register_request("arvel", "arvel@x.com"))
        .await
        .unwrap();
    let old_hash = store
        .find_by_uuid(registered.uuid)
        .await
        .unwrap()
        .unwrap()
        .password_hash;

    let mut request = update_from(&registered);
    request.password = "newpass456".to_string();
    request.confirm_password = "newpass456".to_string();
    service.update(registered.uuid, request).await.unwrap();

    let new_hash = store
        .find_by_uuid(registered.uuid)
        .await
        .unwrap()
        .unwrap()
        .password_hash;
    assert_ne!(old_hash, new_hash);
    assert!(matches!(
        service.login(login("arvel", "arvel123")).await,
        Err(AppError::InvalidCredentials)
    ));
    assert!(service.login(login("arvel", "newpass456")).await.is_ok());
}

#[tokio::test]
async fn test_update_same_password_still_rehashes() {
    let (store, service) = setup();
    let registered = service
        .register(register_request("arvel", "arvel@x.com"))
        .await
        .unwrap();
    let before = store.find_by_uuid(registered.uuid).await.unwrap().unwrap();

    service
        .update(registered.uuid, update_from(&registered))
        .await
        .unwrap();

    let after = store.find_by_uuid(registered.uuid).await.unwrap().unwrap();
    assert_ne!(before.password_hash, after.password_hash);
}

#[tokio::test]
async fn test_update_unknown_user() {
    let (_, service) = setup();
    let request = UpdateRequest {
        name: "Ghost".to_string(),
        username: "ghost".to_string(),
        password: "x".to_string(),
        confirm_password: "x".to_string(),
        email: "ghost@x.com".to_string(),
        phone_number: "0".to_string(),
    };

    assert!(matches!(
        service.update(Uuid::new_v4(), request).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn test_update_can_take_name_freed_by_deleted_user() {
    let (store, service) = setup();
    let a = service.register(register_request("a", "a@x.com")).await.unwrap();
    let b = service.register(register_request("b", "b@x.com")).await.unwrap();
    store.soft_delete(a.uuid).await.unwrap();

    let mut request = update_from(&b);
    request.username = "a".to_string();
    let updated = service.update(b.uuid, request).await.unwrap();

    assert_eq!(updated.username, "a");
    assert_eq!(updated.uuid, b.uuid);
}

// =============================================================================
// GetByUUID / GetCurrent
// =============================================================================

#[tokio::test]
async fn test_get_by_uuid_not_found() {
    let (_, service) = setup();

    assert!(matches!(
        service.get_by_uuid(Uuid::new_v4()).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn test_current_returns_token_identity() {
    let (_, service) = setup();
    service
        .register(register_request("arvel", "arvel@x.com"))
        .await
        .unwrap();
    let response = service.login(login("arvel", "arvel123")).await.unwrap();
    let claims = tokens().verify(&response.token).unwrap();

    let current = service.current(&claims);

    assert_eq!(current, response.user);
    assert_eq!(claims.account(), &current);
    assert_eq!(current.phone_number, "0827");
}

// =============================================================================
// Wiring
// =============================================================================

fn config_with_secret(secret: &str) -> UserServiceConfig {
    UserServiceConfig {
        database: DatabaseConfig::default(),
        jwt: JwtConfig {
            secret: secret.to_string(),
            expiration_minutes: 60,
        },
        hashing: HashingConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        },
        seed: None,
    }
}

#[test]
fn test_account_service_requires_signing_secret() {
    let store = Arc::new(InMemoryUserStore::new());
    let result = build_account_service(&config_with_secret(""), store);

    assert!(matches!(result, Err(AppError::Configuration(_))));
}

#[tokio::test]
async fn test_account_service_wires_configured_secret() {
    let secret = std::str::from_utf8(SECRET).unwrap();
    let service =
        build_account_service(&config_with_secret(secret), Arc::new(InMemoryUserStore::new()))
            .unwrap();
    service
        .register(register_request("arvel", "arvel@x.com"))
        .await
        .unwrap();

    let response = service.login(login("arvel", "arvel123")).await.unwrap();

    assert!(tokens().verify(&response.token).is_ok());
}
