// Registration and activation flow over the in-memory store.

mod common;

use std::sync::Arc;

use identity_server::error::IdentityError;
use identity_server::roles::StaticRoleDirectory;
use identity_server::storage::Storage;

use common::{harness, harness_with_roles, registration, wait_until};

#[tokio::test]
async fn test_registered_account_starts_inactive() {
    let h = harness();

    let result = h
        .accounts
        .register(registration("alice", "alice@example.com", "Secret123!"))
        .await
        .unwrap();

    assert_eq!(result.email, "alice@example.com");

    let account = h.storage.get_account(&result.id).await.unwrap().unwrap();
    assert!(!account.active);
    assert_eq!(account.username, "alice");
    assert_eq!(account.role_id, "role-user");
    // Stored credential is a hash, never the plaintext
    assert_ne!(account.password_hash, "Secret123!");
}

#[tokio::test]
async fn test_duplicate_username_fails_second_attempt() {
    let h = harness();

    let first = h
        .accounts
        .register(registration("alice", "alice@example.com", "Secret123!"))
        .await
        .unwrap();

    let err = h
        .accounts
        .register(registration("alice", "other@example.com", "Secret123!"))
        .await
        .unwrap_err();

    match err {
        IdentityError::Duplicate { field } => assert_eq!(field, "username"),
        other => panic!("expected duplicate error, got {:?}", other),
    }

    // First account remains unaffected
    let kept = h.storage.get_account(&first.id).await.unwrap().unwrap();
    assert_eq!(kept.email, "alice@example.com");
}

#[tokio::test]
async fn test_registration_dispatches_activation_email() {
    let h = harness();

    let result = h
        .accounts
        .register(registration("alice", "alice@example.com", "Secret123!"))
        .await
        .unwrap();

    // Dispatch runs on a background task
    let mailer = h.mailer.clone();
    assert!(
        wait_until(move || {
            let mailer = mailer.clone();
            async move { !mailer.sent().await.is_empty() }
        })
        .await
    );

    let sent = h.mailer.sent().await;
    assert_eq!(sent.len(), 1);
    let message = &sent[0];
    assert_eq!(message.to, "alice@example.com");
    assert_eq!(message.subject, "Acme - Account Activation");

    // The activation link carries a verifiable registration token
    let url_start = message
        .text
        .find("http://web.test/activation-user/")
        .expect("activation url missing");
    let token = &message.text[url_start + "http://web.test/activation-user/".len()..];
    let claims = h.tokens.verify(token.trim()).unwrap();
    assert_eq!(claims.id, result.id);
    assert_eq!(claims.username, "alice");
    assert_eq!(claims.role.unwrap().name, "user");
}

#[tokio::test]
async fn test_registration_fails_when_default_role_is_missing() {
    let h = harness_with_roles(Arc::new(StaticRoleDirectory::empty()));

    let err = h
        .accounts
        .register(registration("alice", "alice@example.com", "Secret123!"))
        .await
        .unwrap_err();

    assert!(matches!(err, IdentityError::RoleNotFound(_)));
    assert!(h.storage.list_accounts().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_activation_is_idempotent() {
    let h = harness();

    let result = h
        .accounts
        .register(registration("alice", "alice@example.com", "Secret123!"))
        .await
        .unwrap();

    let status = h.accounts.activate(&result.id).await.unwrap();
    assert!(status.status);
    let account = h.storage.get_account(&result.id).await.unwrap().unwrap();
    assert!(account.active);

    // Re-activating an already active account is not an error
    let status = h.accounts.activate(&result.id).await.unwrap();
    assert!(status.status);
    let account = h.storage.get_account(&result.id).await.unwrap().unwrap();
    assert!(account.active);
}

#[tokio::test]
async fn test_activation_of_unknown_account_is_not_found() {
    let h = harness();

    let err = h.accounts.activate("no-such-id").await.unwrap_err();
    assert!(matches!(err, IdentityError::NotFound(_)));
}

#[tokio::test]
async fn test_malformed_email_is_a_validation_error() {
    let h = harness();

    let err = h
        .accounts
        .register(registration("alice", "not-an-email", "Secret123!"))
        .await
        .unwrap_err();

    assert!(matches!(err, IdentityError::Validation(_)));
}
