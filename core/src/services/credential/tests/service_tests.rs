//! Unit tests for the credential token service

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::domain::entities::credential_token::{CredentialTokenKind, CREDENTIAL_TOKEN_LENGTH};
use crate::domain::entities::user::UserRole;
use crate::errors::{DomainError, TokenError};
use crate::repositories::MockCredentialTokenRepository;
use crate::services::credential::{CredentialTokenConfig, CredentialTokenService};

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn service() -> (
    CredentialTokenService<MockCredentialTokenRepository>,
    Arc<MockCredentialTokenRepository>,
) {
    let repository = Arc::new(MockCredentialTokenRepository::new());
    let service = CredentialTokenService::new(
        Arc::clone(&repository),
        CredentialTokenConfig::default(),
    );
    (service, repository)
}

#[tokio::test]
async fn test_create_mints_opaque_token_with_kind_ttl() {
    let (service, _) = service();
    let now = fixed_now();
    let user_id = Uuid::new_v4();

    let token = service
        .create(CredentialTokenKind::PasswordReset, user_id, now)
        .await
        .unwrap();

    assert_eq!(token.token.len(), CREDENTIAL_TOKEN_LENGTH);
    assert!(token.token.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(token.kind, CredentialTokenKind::PasswordReset);
    assert_eq!(token.user_id, user_id);
    assert_eq!(token.expires_at, now + Duration::hours(1));
    assert!(token.invite_role.is_none());
}

#[tokio::test]
async fn test_create_rejects_invite_kind() {
    let (service, repository) = service();

    let result = service
        .create(CredentialTokenKind::Invite, Uuid::new_v4(), fixed_now())
        .await;

    assert!(matches!(result, Err(DomainError::Internal { .. })));
    assert!(repository.is_empty().await);
}

#[tokio::test]
async fn test_create_invite_carries_role_and_manager() {
    let (service, _) = service();
    let now = fixed_now();
    let user_id = Uuid::new_v4();
    let manager_id = Uuid::new_v4();

    let token = service
        .create_invite(user_id, UserRole::Employee, Some(manager_id), now)
        .await
        .unwrap();

    assert_eq!(token.kind, CredentialTokenKind::Invite);
    assert_eq!(token.invite_role, Some(UserRole::Employee));
    assert_eq!(token.invite_manager_id, Some(manager_id));
    assert_eq!(token.expires_at, now + Duration::days(7));
}

#[tokio::test]
async fn test_lookup_finds_stored_token() {
    let (service, _) = service();
    let now = fixed_now();

    let minted = service
        .create(CredentialTokenKind::EmailVerification, Uuid::new_v4(), now)
        .await
        .unwrap();

    let found = service
        .lookup(CredentialTokenKind::EmailVerification, &minted.token)
        .await
        .unwrap();
    assert_eq!(found, minted);
}

#[tokio::test]
async fn test_lookup_unknown_token_is_not_found() {
    let (service, _) = service();

    let result = service
        .lookup(CredentialTokenKind::EmailVerification, "no-such-token")
        .await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::NotFound))
    ));
}

#[tokio::test]
async fn test_lookup_is_scoped_by_kind() {
    let (service, _) = service();
    let now = fixed_now();

    let minted = service
        .create(CredentialTokenKind::EmailVerification, Uuid::new_v4(), now)
        .await
        .unwrap();

    // Same opaque string under a different kind does not resolve.
    let result = service
        .lookup(CredentialTokenKind::PasswordReset, &minted.token)
        .await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::NotFound))
    ));
}

#[tokio::test]
async fn test_consume_succeeds_exactly_once() {
    let (service, _) = service();
    let now = fixed_now();

    let minted = service
        .create(CredentialTokenKind::PasswordReset, Uuid::new_v4(), now)
        .await
        .unwrap();

    let first = service
        .consume(CredentialTokenKind::PasswordReset, &minted.token)
        .await
        .unwrap();
    let second = service
        .consume(CredentialTokenKind::PasswordReset, &minted.token)
        .await
        .unwrap();

    assert!(first);
    assert!(!second);
}

#[tokio::test]
async fn test_consume_unknown_token_is_false() {
    let (service, _) = service();

    let consumed = service
        .consume(CredentialTokenKind::PasswordReset, "no-such-token")
        .await
        .unwrap();
    assert!(!consumed);
}

#[tokio::test]
async fn test_expired_rows_stay_until_consumed_or_purged() {
    let (service, _) = service();
    let minted_at = fixed_now();

    let minted = service
        .create(CredentialTokenKind::PasswordReset, Uuid::new_v4(), minted_at)
        .await
        .unwrap();

    // Well past the one hour reset TTL.
    let later = minted_at + Duration::hours(3);

    // Lookup still returns the row; expiry is the caller's call.
    let found = service
        .lookup(CredentialTokenKind::PasswordReset, &minted.token)
        .await
        .unwrap();
    assert!(found.is_expired_at(later));

    // The row is still consumable, so a flow that chooses to reject it
    // can still burn it.
    assert!(service
        .consume(CredentialTokenKind::PasswordReset, &minted.token)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_purge_expired_sweeps_only_expired_rows_of_kind() {
    let (service, repository) = service();
    let now = fixed_now();
    let user_id = Uuid::new_v4();

    // One reset token already past its TTL, one fresh, and one
    // verification token older than both.
    let stale = service
        .create(CredentialTokenKind::PasswordReset, user_id, now - Duration::hours(2))
        .await
        .unwrap();
    let fresh = service
        .create(CredentialTokenKind::PasswordReset, user_id, now)
        .await
        .unwrap();
    let other_kind = service
        .create(CredentialTokenKind::EmailVerification, user_id, now - Duration::hours(2))
        .await
        .unwrap();

    let purged = service
        .purge_expired(CredentialTokenKind::PasswordReset, now)
        .await
        .unwrap();

    assert_eq!(purged, 1);
    assert!(service
        .lookup(CredentialTokenKind::PasswordReset, &stale.token)
        .await
        .is_err());
    assert!(service
        .lookup(CredentialTokenKind::PasswordReset, &fresh.token)
        .await
        .is_ok());
    // The 24 hour verification TTL keeps the older row alive, and purging
    // one kind never touches another anyway.
    assert!(service
        .lookup(CredentialTokenKind::EmailVerification, &other_kind.token)
        .await
        .is_ok());
    assert_eq!(repository.len().await, 2);
}

#[tokio::test]
async fn test_multiple_outstanding_tokens_per_user() {
    let (service, _) = service();
    let now = fixed_now();
    let user_id = Uuid::new_v4();

    let first = service
        .create(CredentialTokenKind::PasswordReset, user_id, now)
        .await
        .unwrap();
    let second = service
        .create(CredentialTokenKind::PasswordReset, user_id, now)
        .await
        .unwrap();

    assert_ne!(first.token, second.token);
    assert!(service
        .lookup(CredentialTokenKind::PasswordReset, &first.token)
        .await
        .is_ok());
    assert!(service
        .lookup(CredentialTokenKind::PasswordReset, &second.token)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_ttl_ms_for_matches_config() {
    let repository = Arc::new(MockCredentialTokenRepository::new());
    let service = CredentialTokenService::new(
        repository,
        CredentialTokenConfig {
            verification_ttl_ms: 1_000,
            password_reset_ttl_ms: 2_000,
            invite_ttl_ms: 3_000,
        },
    );

    assert_eq!(service.ttl_ms_for(CredentialTokenKind::EmailVerification), 1_000);
    assert_eq!(service.ttl_ms_for(CredentialTokenKind::PasswordReset), 2_000);
    assert_eq!(service.ttl_ms_for(CredentialTokenKind::Invite), 3_000);
}
